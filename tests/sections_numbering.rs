//! Parameterized tests for section-numbering inference (C7 §4.7 steps 2-4),
//! exercised end to end through `build_paper` rather than the private
//! normalization helpers.

use rstest::rstest;
use serde_json::{json, Value};

use s2orc_structure::model::Content;
use s2orc_structure::RawPaper;

fn one_header_paper(header_text: &str, n: Option<&str>) -> RawPaper {
    let mut header = json!({ "start": 0, "end": header_text.len() });
    if let Some(n) = n {
        header["attributes"] = json!({ "n": n });
    }
    let raw: Value = json!({
        "corpusid": 1,
        "content": {
            "text": header_text,
            "annotations": { "sectionheader": [header] },
        }
    });
    serde_json::from_value(raw).unwrap()
}

#[rstest]
#[case("2.1 Related Work", None, vec!["2", "1"])]
#[case("Conclusion", None, vec![""])]
#[case("10 Introduction", None, vec![""])]
#[case("Unrelated header text", Some("3.2"), vec!["3", "2"])]
#[case("Appendix", Some("A.1"), vec!["A", "1"])]
#[case("..2..1.. Weird Punctuation", None, vec!["2", "1"])]
fn numbering_is_inferred_per_spec(
    #[case] header_text: &str,
    #[case] n: Option<&str>,
    #[case] expected_level: Vec<&str>,
) {
    let raw = one_header_paper(header_text, n);
    let paper = s2orc_structure::build_paper(raw).unwrap();
    let Content::Section(section) = &paper.contents[0] else {
        panic!("expected a top-level section")
    };
    assert_eq!(section.section_level, expected_level);
}
