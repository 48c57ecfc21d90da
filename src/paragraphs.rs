//! C6 -- Paragraph Builder.
//!
//! Builds one [`Paragraph`] per un-consumed `paragraph` annotation and binds
//! every reference marker whose span falls inside it, converting the
//! marker's absolute span to a paragraph-relative one. Binding is
//! non-consuming: a marker that (incorrectly) falls inside more than one
//! paragraph span is bound to all of them, matching upstream's own
//! containment scan rather than a first-match-wins pop.

use std::collections::HashSet;

use crate::collect::{ContentAnnotation, ContentKey};
use crate::model::{Paragraph, ReferenceMarker};
use crate::span::{Span, TextSpan};

/// Build every paragraph not already claimed by C4, binding reference
/// markers contained in its span, then collapse near-duplicate paragraphs
/// (§4.6 dedup pass). `done` is updated in place so C7/C8 do not see
/// paragraph indices again.
pub fn build_paragraphs(
    content_annotations: &[ContentAnnotation],
    reference_markers: &[ReferenceMarker],
    raw_text: &str,
    done: &mut HashSet<usize>,
) -> Vec<Paragraph> {
    let mut paragraphs = Vec::new();

    for (i, ann) in content_annotations.iter().enumerate() {
        if ann.key != ContentKey::Paragraph || done.contains(&i) {
            continue;
        }
        let span = Span::new(ann.start, ann.end);

        let markers = reference_markers
            .iter()
            .filter_map(|m| bind(m, span))
            .collect();

        paragraphs.push(Paragraph {
            content_id: Some(vec![i as i64]),
            text_span: TextSpan::new(&raw_text[ann.start..ann.end], span),
            reference_markers: markers,
        });

        done.insert(i);
    }

    dedupe_paragraphs(paragraphs)
}

fn bind(marker: &ReferenceMarker, paragraph_span: Span) -> Option<ReferenceMarker> {
    let marker_span = marker.text_span.original_span?;
    if !paragraph_span.contains(&marker_span) {
        return None;
    }
    let mut bound = marker.clone();
    bound.relative_span = Some(Span::new(
        marker_span.start - paragraph_span.start,
        marker_span.end - paragraph_span.start,
    ));
    Some(bound)
}

/// Walk `paragraphs` (already in start order) pairwise, replacing `prev`
/// with `curr` when `curr` is a strict text extension of `prev`, or when
/// the two texts are byte-identical and `curr` carries strictly more
/// reference markers (§4.6). The rule is intentionally asymmetric: a chain
/// of progressively-extending paragraphs collapses to the single longest.
fn dedupe_paragraphs(paragraphs: Vec<Paragraph>) -> Vec<Paragraph> {
    let mut out: Vec<Paragraph> = Vec::with_capacity(paragraphs.len());
    for curr in paragraphs {
        match out.last() {
            Some(prev) if should_replace(prev, &curr) => {
                out.pop();
                out.push(curr);
            }
            _ => out.push(curr),
        }
    }
    out
}

fn should_replace(prev: &Paragraph, curr: &Paragraph) -> bool {
    let prev_text = &prev.text_span.text;
    let curr_text = &curr.text_span.text;
    if curr_text.starts_with(prev_text.as_str()) && curr_text != prev_text {
        return true;
    }
    curr_text == prev_text && curr.reference_markers.len() > prev.reference_markers.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReferenceMarkerType;
    use std::collections::HashMap;

    fn ca(start: usize, end: usize) -> ContentAnnotation {
        ContentAnnotation {
            key: ContentKey::Paragraph,
            start,
            end,
            attributes: HashMap::new(),
        }
    }

    fn marker(start: usize, end: usize) -> ReferenceMarker {
        ReferenceMarker {
            text_span: TextSpan::new("[1]", Span::new(start, end)),
            reference_marker_type: ReferenceMarkerType::Bibref,
            referenced_id: None,
            relative_span: None,
        }
    }

    #[test]
    fn binds_marker_with_paragraph_relative_span() {
        let text = "word1 word2 [1] word3";
        let annotations = vec![ca(0, 21)];
        let markers = vec![marker(12, 15)];
        let mut done = HashSet::new();

        let paragraphs = build_paragraphs(&annotations, &markers, text, &mut done);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].reference_markers.len(), 1);
        assert_eq!(
            paragraphs[0].reference_markers[0].relative_span,
            Some(Span::new(12, 15))
        );
        assert!(done.contains(&0));
    }

    #[test]
    fn marker_outside_paragraph_span_is_dropped() {
        let text = "word1 word2 word3 [1]";
        let annotations = vec![ca(0, 17)];
        let markers = vec![marker(18, 21)];
        let mut done = HashSet::new();

        let paragraphs = build_paragraphs(&annotations, &markers, text, &mut done);
        assert_eq!(paragraphs[0].reference_markers.len(), 0);
    }

    #[test]
    fn skips_indices_already_claimed_by_leaf_content() {
        let annotations = vec![ca(0, 5)];
        let mut done = HashSet::from([0]);
        let paragraphs = build_paragraphs(&annotations, &[], "01234", &mut done);
        assert!(paragraphs.is_empty());
    }

    #[test]
    fn strict_extension_replaces_the_shorter_paragraph() {
        let text = "Hello|Hello world|unrelated";
        let annotations = vec![ca(0, 5), ca(6, 17)];
        let mut done = HashSet::new();
        let paragraphs = build_paragraphs(&annotations, &[], text, &mut done);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text_span.text, "Hello world");
    }

    #[test]
    fn chain_of_extensions_collapses_to_the_longest() {
        let text = "A|AB|ABC";
        let annotations = vec![ca(0, 1), ca(2, 4), ca(5, 8)];
        let mut done = HashSet::new();
        let paragraphs = build_paragraphs(&annotations, &[], text, &mut done);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text_span.text, "ABC");
    }

    #[test]
    fn identical_text_keeps_the_one_with_more_markers() {
        let text = "Same text|Same text";
        let annotations = vec![ca(0, 9), ca(10, 19)];
        let markers = vec![marker(10, 13)];
        let mut done = HashSet::new();
        let paragraphs = build_paragraphs(&annotations, &markers, text, &mut done);
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].reference_markers.len(), 1);
    }

    #[test]
    fn unrelated_texts_are_both_kept() {
        let text = "Hello|Goodbye";
        let annotations = vec![ca(0, 5), ca(6, 13)];
        let mut done = HashSet::new();
        let paragraphs = build_paragraphs(&annotations, &[], text, &mut done);
        assert_eq!(paragraphs.len(), 2);
    }
}
