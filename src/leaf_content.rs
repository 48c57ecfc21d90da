//! C4 -- Leaf-Content Builder.

use std::collections::HashSet;

use serde_json::Value;

use crate::collect::{ContentAnnotation, ContentKey};
use crate::idmap::{register, IdMap};
use crate::model::{Formula, Infographic, InfographicKind, ReferencedId};
use crate::span::{Span, TextSpan};

/// For each annotation index, the indices of every other annotation whose
/// span overlaps it, in ascending order of the other index.
fn find_overlaps(annotations: &[ContentAnnotation]) -> Vec<Vec<usize>> {
    let n = annotations.len();
    let mut overlaps = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if annotations[j].start < annotations[i].end {
                overlaps[i].push(j);
                overlaps[j].push(i);
            } else {
                break;
            }
        }
    }
    overlaps
}

fn attribute_str(attrs: &std::collections::HashMap<String, Value>, key: &str) -> Option<String> {
    attrs.get(key)?.as_str().map(str::to_string)
}

/// Build every figure/table and formula leaf, marking their own index (and
/// any header/caption annotations they consumed) as `done` so C6/C7 skip
/// them.
pub fn build_leaf_content(
    content_annotations: &[ContentAnnotation],
    raw_text: &str,
    id_map: &mut IdMap,
) -> (Vec<Infographic>, Vec<Formula>, HashSet<usize>) {
    let overlaps = find_overlaps(content_annotations);

    let mut infographics = Vec::new();
    let mut formulas = Vec::new();
    let mut done = HashSet::new();

    for (i, ann_i) in content_annotations.iter().enumerate() {
        let provisional_id = vec![i as i64];
        let text_i = &raw_text[ann_i.start..ann_i.end];
        let span_i = Span::new(ann_i.start, ann_i.end);
        let original_id = attribute_str(&ann_i.attributes, "id");

        match ann_i.key {
            ContentKey::Figure | ContentKey::Table => {
                let header = find_overlap_span(
                    &overlaps[i],
                    content_annotations,
                    raw_text,
                    ContentKey::SectionHeader,
                    &mut done,
                );
                let caption = find_overlap_span(
                    &overlaps[i],
                    content_annotations,
                    raw_text,
                    ContentKey::FigureCaption,
                    &mut done,
                );

                infographics.push(Infographic {
                    content_id: Some(provisional_id.clone()),
                    kind: if ann_i.key == ContentKey::Table {
                        InfographicKind::Table
                    } else {
                        InfographicKind::Figure
                    },
                    text_span: TextSpan::new(text_i, span_i),
                    header,
                    caption,
                });
            }
            ContentKey::Formula => {
                formulas.push(Formula {
                    content_id: Some(provisional_id.clone()),
                    text_span: TextSpan::new(text_i, span_i),
                });
            }
            ContentKey::SectionHeader | ContentKey::Paragraph | ContentKey::FigureCaption => {
                continue;
            }
        }

        done.insert(i);
        register(id_map, original_id.as_deref(), ReferencedId::Content(provisional_id));
    }

    (infographics, formulas, done)
}

fn find_overlap_span(
    overlap_indices: &[usize],
    content_annotations: &[ContentAnnotation],
    raw_text: &str,
    wanted: ContentKey,
    done: &mut HashSet<usize>,
) -> TextSpan {
    match overlap_indices.iter().find(|&&j| content_annotations[j].key == wanted) {
        Some(&j) => {
            let ann_j = &content_annotations[j];
            done.insert(j);
            TextSpan::new(&raw_text[ann_j.start..ann_j.end], Span::new(ann_j.start, ann_j.end))
        }
        None => TextSpan::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn ca(key: ContentKey, start: usize, end: usize) -> ContentAnnotation {
        ContentAnnotation {
            key,
            start,
            end,
            attributes: HashMap::new(),
        }
    }

    #[test]
    fn figure_picks_up_overlapping_header_and_caption() {
        let text = "HEADERTEXT THE FIGURE BODY CAPTION TEXT HERE";
        let annotations = vec![
            ca(ContentKey::SectionHeader, 0, 10),
            ca(ContentKey::Figure, 0, 35),
            ca(ContentKey::FigureCaption, 27, 40),
        ];
        let mut id_map = IdMap::new();
        let (infographics, formulas, done) =
            build_leaf_content(&annotations, text, &mut id_map);

        assert_eq!(infographics.len(), 1);
        assert!(formulas.is_empty());
        assert_eq!(infographics[0].header.text, "HEADERTEXT");
        assert_eq!(infographics[0].caption.text, &text[27..40]);
        assert!(done.contains(&0)); // header consumed
        assert!(done.contains(&1)); // figure itself
        assert!(done.contains(&2)); // caption consumed
    }

    #[test]
    fn figure_with_no_overlap_gets_empty_header_and_caption() {
        let text = "0123456789";
        let annotations = vec![ca(ContentKey::Figure, 0, 10)];
        let mut id_map = IdMap::new();
        let (infographics, _, _) = build_leaf_content(&annotations, text, &mut id_map);
        assert_eq!(infographics[0].header, TextSpan::empty());
        assert_eq!(infographics[0].caption, TextSpan::empty());
    }

    #[test]
    fn formula_registers_first_occurrence_in_id_map() {
        let text = "0123456789";
        let mut annotations = vec![ca(ContentKey::Formula, 0, 5)];
        annotations[0]
            .attributes
            .insert("id".to_string(), serde_json::json!("f1"));
        let mut id_map = IdMap::new();
        let (_, formulas, done) = build_leaf_content(&annotations, text, &mut id_map);
        assert_eq!(formulas.len(), 1);
        assert!(done.contains(&0));
        assert_eq!(id_map.get("f1"), Some(&ReferencedId::Content(vec![0])));
    }
}
