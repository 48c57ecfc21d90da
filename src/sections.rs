//! C7 -- Section Builder.
//!
//! Builds one [`Section`] per un-consumed `sectionheader` annotation,
//! inferring its dotted numbering from `attributes.n` or the header text,
//! and synthesizes empty placeholder ancestors for any numbering level
//! upstream skipped (e.g. a "2.1.3" header appearing with no "2" or "2.1"
//! header of its own).

use std::collections::HashSet;

use regex::Regex;
use std::sync::OnceLock;

use crate::collect::{ContentAnnotation, ContentKey};
use crate::model::Section;
use crate::span::{Span, TextSpan};

fn numbering_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*([\w.]+)").unwrap())
}

/// Derive the raw numbering string `n` for a header (§4.7 step 2): prefer
/// `attributes.n` when it is a non-empty string, otherwise fall back to a
/// leading `[\w.]+` run of the header text, but only if that run actually
/// contains a `.` -- a bare leading number with no dots (e.g. "10
/// Introduction") is not numbering evidence on its own.
fn derive_numbering_string(
    attributes: &std::collections::HashMap<String, serde_json::Value>,
    header_text: &str,
) -> String {
    if let Some(n) = attributes.get("n").and_then(serde_json::Value::as_str) {
        if !n.is_empty() {
            return n.to_string();
        }
    }
    match numbering_pattern().captures(header_text) {
        Some(caps) if caps[1].contains('.') => caps[1].to_string(),
        _ => String::new(),
    }
}

/// Normalize `n` (§4.7 step 3): strip leading/trailing spaces and periods,
/// replace every non-alphanumeric with `.`, then collapse runs of `.`.
fn normalize_numbering(n: &str) -> String {
    let replaced: String = n
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '.' })
        .collect();
    let mut collapsed = String::with_capacity(replaced.len());
    let mut prev_dot = false;
    for c in replaced.chars() {
        if c == '.' {
            if !prev_dot {
                collapsed.push(c);
            }
            prev_dot = true;
        } else {
            collapsed.push(c);
            prev_dot = false;
        }
    }
    collapsed.trim_matches('.').to_string()
}

/// `section_level = tuple(n.split("."))`, degenerate `[""]` when `n == ""`.
fn level_from_numbering(n: &str) -> Vec<String> {
    if n.is_empty() {
        vec![String::new()]
    } else {
        n.split('.').map(str::to_string).collect()
    }
}

fn is_degenerate(level: &[String]) -> bool {
    level.len() == 1 && level[0].is_empty()
}

/// Build every top-level section header, synthesizing the immediate missing
/// parent level in document order as it is first needed.
pub fn build_sections(content_annotations: &[ContentAnnotation], raw_text: &str, done: &mut HashSet<usize>) -> Vec<Section> {
    let mut out: Vec<Section> = Vec::new();
    let mut seen_levels: HashSet<Vec<String>> = HashSet::new();

    for (i, ann) in content_annotations.iter().enumerate() {
        if ann.key != ContentKey::SectionHeader || done.contains(&i) {
            continue;
        }
        let header_text = &raw_text[ann.start..ann.end];

        // Consecutive duplicate header suppression (§4.7 step 1): compare
        // against the last *emitted* (non-synthesized) section, i.e. the
        // last entry pushed for a real annotation rather than an ancestor.
        if out.last().is_some_and(|last| last.header.text == header_text) {
            done.insert(i);
            continue;
        }

        let n = normalize_numbering(&derive_numbering_string(&ann.attributes, header_text));
        let level = level_from_numbering(&n);

        // §4.7 step 5 synthesizes only the single immediate parent
        // `level[:-1]`, not every transitive ancestor prefix -- a header
        // like "2.1.3" with no prior "2" or "2.1" header synthesizes just
        // "2.1", never a standalone "2".
        if !is_degenerate(&level) {
            if level.len() > 1 {
                let parent = level[..level.len() - 1].to_vec();
                if seen_levels.insert(parent.clone()) {
                    out.push(Section {
                        content_id: None,
                        section_level: parent,
                        header: TextSpan::new(String::new(), Span::zero_width(ann.start)),
                        contents: Vec::new(),
                    });
                }
            }
            seen_levels.insert(level.clone());
        }

        out.push(Section {
            content_id: Some(vec![i as i64]),
            section_level: level,
            header: TextSpan::new(header_text, Span::new(ann.start, ann.end)),
            contents: Vec::new(),
        });
        done.insert(i);
    }

    out
}
