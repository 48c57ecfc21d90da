//! Property tests for the annotation sanitizer's two global invariants:
//! merged spans never overlap and stay sorted (invariant 8), and running the
//! sanitizer twice is the same as running it once (invariant 7).

use std::collections::HashMap;

use proptest::collection::vec as pvec;
use proptest::prelude::*;
use serde_json::{json, Value};

use s2orc_structure::annotation::{sanitize_annotations, RawAnnotations};

fn arbitrary_span(max_end: usize) -> impl Strategy<Value = (usize, usize)> {
    (0..max_end, 0..max_end).prop_filter_map("start < end", |(a, b)| {
        if a == b {
            None
        } else if a < b {
            Some((a, b))
        } else {
            Some((b, a))
        }
    })
}

fn raw_annotations_from_spans(key: &str, spans: Vec<(usize, usize)>) -> RawAnnotations {
    let entries: Vec<Value> = spans
        .into_iter()
        .map(|(start, end)| json!({ "start": start, "end": end }))
        .collect();
    HashMap::from([(key.to_string(), Value::Array(entries))])
}

proptest! {
    #[test]
    fn merged_spans_are_sorted_and_pairwise_non_overlapping(
        spans in pvec(arbitrary_span(200), 0..40)
    ) {
        let raw = raw_annotations_from_spans("paragraph", spans);
        let sanitized = sanitize_annotations(&raw, 200);
        let merged = &sanitized["paragraph"];

        for pair in merged.windows(2) {
            prop_assert!(pair[0].start <= pair[1].start);
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    #[test]
    fn sanitizing_twice_is_the_same_as_sanitizing_once(
        spans in pvec(arbitrary_span(200), 0..40)
    ) {
        let raw = raw_annotations_from_spans("figure", spans);
        let once = sanitize_annotations(&raw, 200);

        let reencoded: RawAnnotations = once
            .iter()
            .map(|(key, anns)| {
                let arr: Vec<Value> = anns
                    .iter()
                    .map(|a| json!({ "start": a.start, "end": a.end }))
                    .collect();
                (key.clone(), Value::Array(arr))
            })
            .collect();
        let twice = sanitize_annotations(&reencoded, 200);

        prop_assert_eq!(once, twice);
    }
}
