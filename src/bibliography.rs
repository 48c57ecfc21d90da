//! C2 -- Bibliography Builder.

use crate::annotation::{Annotation, SanitizedAnnotations};
use crate::idmap::{register_overwrite, IdMap};
use crate::model::{BibliographyEntry, ReferencedId};
use crate::span::{Span, TextSpan};

/// Build the ordered bibliography and populate the id-map with
/// `original_id -> bibliography_id` for every entry that carries one.
pub fn build_bibliography(
    annotations: &SanitizedAnnotations,
    raw_text: &str,
    id_map: &mut IdMap,
) -> Vec<BibliographyEntry> {
    let mut entries: Vec<&Annotation> = annotations
        .get("bibentry")
        .map(|v| v.iter().collect())
        .unwrap_or_default();
    entries.sort_by_key(|a| a.start);

    entries
        .into_iter()
        .enumerate()
        .map(|(i, ann)| {
            let original_id = attribute_str(ann, "id");
            register_overwrite(
                id_map,
                original_id.as_deref(),
                ReferencedId::Bibliography(i as i64),
            );

            BibliographyEntry {
                text_span: TextSpan::new(&raw_text[ann.start..ann.end], Span::new(ann.start, ann.end)),
                bibliography_id: i,
                corpusid: attribute_i64(ann, "matched_paper_id"),
                original_id,
            }
        })
        .collect()
}

fn attribute_str(ann: &Annotation, key: &str) -> Option<String> {
    ann.attributes.get(key)?.as_str().map(str::to_string)
}

fn attribute_i64(ann: &Annotation, key: &str) -> Option<i64> {
    ann.attributes.get(key)?.as_i64()
}
