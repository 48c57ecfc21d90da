//! C5 -- Reference-Marker Builder.
//!
//! Produces the flat list of `bibref`/`figureref`/`tableref` markers that C6
//! later binds to their enclosing paragraph. Resolution against the id-map
//! happens here; binding to a paragraph's `relative_span` happens in C6.

use crate::annotation::SanitizedAnnotations;
use crate::idmap::IdMap;
use crate::model::{ReferenceMarker, ReferenceMarkerType, ReferencedId};
use crate::span::{Span, TextSpan};

fn attribute_str(
    attrs: &std::collections::HashMap<String, serde_json::Value>,
    key: &str,
) -> Option<String> {
    attrs.get(key)?.as_str().map(str::to_string)
}

fn build_one(
    annotations: &SanitizedAnnotations,
    source_key: &str,
    marker_type: ReferenceMarkerType,
    raw_text: &str,
    id_map: &IdMap,
    out: &mut Vec<ReferenceMarker>,
) {
    let Some(entries) = annotations.get(source_key) else {
        return;
    };
    for ann in entries {
        let original_id = attribute_str(&ann.attributes, "ref_id");
        let referenced_id = original_id.and_then(|id| id_map.get(&id).cloned());

        out.push(ReferenceMarker {
            text_span: TextSpan::new(&raw_text[ann.start..ann.end], Span::new(ann.start, ann.end)),
            reference_marker_type: marker_type,
            referenced_id,
            relative_span: None,
        });
    }
}

/// Build every reference marker, resolved against `id_map` as it stood after
/// C2 and C4 ran. A marker whose `ref_id` does not resolve -- because it was
/// never registered, or the key was empty -- keeps `referenced_id: None`
/// rather than being dropped (§4.5 Dangling references).
pub fn build_reference_markers(
    annotations: &SanitizedAnnotations,
    raw_text: &str,
    id_map: &IdMap,
) -> Vec<ReferenceMarker> {
    let mut out = Vec::new();
    build_one(annotations, "bibref", ReferenceMarkerType::Bibref, raw_text, id_map, &mut out);
    build_one(annotations, "figureref", ReferenceMarkerType::Figureref, raw_text, id_map, &mut out);
    build_one(annotations, "tableref", ReferenceMarkerType::Tableref, raw_text, id_map, &mut out);
    out.sort_by_key(|m| m.text_span.original_span.map(|s| s.start).unwrap_or(0));
    out
}
