//! C1 -- Annotation Sanitizer.
//!
//! Normalizes, validates, dedupes, and merges overlapping spans for each
//! annotation key in the upstream record before any structural component
//! touches them.

use std::collections::HashMap;

use serde_json::Value;
use tracing::warn;

/// A single validated, integer-offset annotation with its opaque attribute
/// bag (upstream recognizes `id`, `n`, `ref_id`, `matched_paper_id`, `type`,
/// but the sanitizer itself does not interpret any of them).
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    pub attributes: HashMap<String, Value>,
}

/// The raw `content.annotations` mapping from the upstream record: each key
/// maps to `null`, a JSON array of annotation objects, or a string encoding
/// such an array (a legacy format carried over from upstream's use of
/// Python's `ast.literal_eval`).
pub type RawAnnotations = HashMap<String, Value>;

/// Sanitized annotations, keyed the same way as the input.
pub type SanitizedAnnotations = HashMap<String, Vec<Annotation>>;

/// Run the full C1 pipeline over every key in `raw`.
pub fn sanitize_annotations(raw: &RawAnnotations, text_len: usize) -> SanitizedAnnotations {
    raw.iter()
        .map(|(key, value)| (key.clone(), sanitize_key(key, value, text_len)))
        .collect()
}

fn sanitize_key(key: &str, value: &Value, text_len: usize) -> Vec<Annotation> {
    let decoded = match decode(value) {
        Ok(entries) => entries,
        Err(reason) => {
            warn!(annotation_key = key, %reason, "malformed annotation: unable to decode; treating key as empty");
            Vec::new()
        }
    };

    let filtered = filter_valid(decoded, text_len);
    let deduped = dedupe_by_span(filtered);
    let mut sorted = deduped;
    sorted.sort_by_key(|a| a.start);
    merge_overlapping(sorted)
}

/// Step 1: decode. `null` becomes an empty list; an array is taken
/// per-entry (entries missing a coercible `start`/`end` are dropped with a
/// warning rather than aborting the whole key -- JSON's static shape makes
/// Rust's per-entry recovery both safe and strictly more useful than
/// Python's whole-key `try`/`except` around `ast.literal_eval`, see
/// DESIGN.md); a string is parsed as a literal encoding of such an array.
fn decode(value: &Value) -> Result<Vec<Annotation>, String> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(decode_array(items)),
        Value::String(s) => decode_literal_string(s),
        other => Err(format!("expected null, array, or string, got {other}")),
    }
}

fn decode_array(items: &[Value]) -> Vec<Annotation> {
    items
        .iter()
        .filter_map(|item| {
            let obj = item.as_object()?;
            let start = coerce_int(obj.get("start")?)?;
            let end = coerce_int(obj.get("end")?)?;
            let attributes = obj
                .get("attributes")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .collect();
            Some(Annotation {
                start,
                end,
                attributes,
            })
        })
        .collect()
}

fn coerce_int(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| usize::try_from(v).ok()),
        Value::String(s) => s.parse::<usize>().ok(),
        _ => None,
    }
}

/// Upstream occasionally emits these as Python-literal-repr strings
/// (single-quoted keys/strings, `None`/`True`/`False`) instead of JSON.
/// Normalize the common cases and fall back to strict JSON parsing.
fn decode_literal_string(raw: &str) -> Result<Vec<Annotation>, String> {
    let normalized = normalize_python_literal(raw);
    let parsed: Value =
        serde_json::from_str(&normalized).map_err(|e| format!("literal parse failed: {e}"))?;
    match parsed {
        Value::Array(items) => Ok(decode_array(&items)),
        other => Err(format!("decoded literal was not a list: {other}")),
    }
}

fn normalize_python_literal(raw: &str) -> String {
    // Swap single-quoted strings for double-quoted ones and Python's
    // singleton spellings for JSON's, without touching apostrophes that
    // appear inside already-double-quoted strings.
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut in_double = false;
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                in_double = !in_double;
                out.push(c);
            }
            '\'' if !in_double => out.push('"'),
            _ => out.push(c),
        }
    }
    out.replace("None", "null")
        .replace("True", "true")
        .replace("False", "false")
}

/// Step 2: filter. Drop entries whose span is not `0 <= start < end <= L`.
fn filter_valid(entries: Vec<Annotation>, text_len: usize) -> Vec<Annotation> {
    entries
        .into_iter()
        .filter(|a| a.start < a.end && a.end <= text_len)
        .collect()
}

/// Step 3: dedupe by `(start, end)`, keeping the first occurrence.
fn dedupe_by_span(entries: Vec<Annotation>) -> Vec<Annotation> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|a| seen.insert((a.start, a.end)))
        .collect()
}

/// Step 5: merge overlapping spans, folding non-colliding attribute keys
/// from the absorbed entry into the surviving one. `entries` must already
/// be sorted ascending by `start` (step 4).
fn merge_overlapping(entries: Vec<Annotation>) -> Vec<Annotation> {
    let mut merged: Vec<Annotation> = Vec::with_capacity(entries.len());
    for curr in entries {
        match merged.last_mut() {
            Some(prev) if curr.start < prev.end => {
                prev.end = prev.end.max(curr.end);
                for (k, v) in curr.attributes {
                    prev.attributes.entry(k).or_insert(v);
                }
            }
            _ => merged.push(curr),
        }
    }
    merged
}
