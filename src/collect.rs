//! C3 -- Content-Annotation Collector.

use std::collections::HashMap;

use serde_json::Value;

use crate::annotation::SanitizedAnnotations;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKey {
    SectionHeader,
    Paragraph,
    Figure,
    Table,
    FigureCaption,
    Formula,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContentAnnotation {
    pub key: ContentKey,
    pub start: usize,
    pub end: usize,
    pub attributes: HashMap<String, Value>,
}

/// Merge the content-bearing annotation keys into a single time-ordered
/// stream, retagging `figure` annotations of `attributes.type == "table"`
/// as `table`. The upstream `table` key itself is ignored -- it duplicates
/// information already present on the retagged `figure` entries with less
/// detail.
pub fn collect_content_annotations(annotations: &SanitizedAnnotations) -> Vec<ContentAnnotation> {
    let mut out = Vec::new();
    // Order matches upstream's own key iteration: ties at the same `start`
    // keep this relative order (§4.3 "original key order is stable").
    push_tagged(&mut out, annotations, "sectionheader", ContentKey::SectionHeader);
    push_tagged(&mut out, annotations, "paragraph", ContentKey::Paragraph);
    push_figures(&mut out, annotations);
    push_tagged(&mut out, annotations, "figurecaption", ContentKey::FigureCaption);
    push_tagged(&mut out, annotations, "formula", ContentKey::Formula);

    out.sort_by_key(|a| a.start);
    out
}

fn push_tagged(
    out: &mut Vec<ContentAnnotation>,
    annotations: &SanitizedAnnotations,
    source_key: &str,
    tag: ContentKey,
) {
    if let Some(entries) = annotations.get(source_key) {
        for ann in entries {
            out.push(ContentAnnotation {
                key: tag,
                start: ann.start,
                end: ann.end,
                attributes: ann.attributes.clone(),
            });
        }
    }
}

fn push_figures(out: &mut Vec<ContentAnnotation>, annotations: &SanitizedAnnotations) {
    if let Some(entries) = annotations.get("figure") {
        for ann in entries {
            let is_table = ann
                .attributes
                .get("type")
                .and_then(Value::as_str)
                .map(|t| t == "table")
                .unwrap_or(false);
            out.push(ContentAnnotation {
                key: if is_table {
                    ContentKey::Table
                } else {
                    ContentKey::Figure
                },
                start: ann.start,
                end: ann.end,
                attributes: ann.attributes.clone(),
            });
        }
    }
}
