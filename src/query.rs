//! Read-only accessors over a built [`Paper`], grounded in upstream's small
//! family of predicate/lookup helpers used by downstream consumers that
//! never need to rebuild the tree themselves.

use crate::model::{BibliographyEntry, Content, ContentId, Paper, Paragraph, ReferencedId};

/// Depth-first, document-order walk over a content tree, descending into
/// sections.
pub fn walk(contents: &[Content]) -> Vec<&Content> {
    let mut out = Vec::new();
    walk_into(contents, &mut out);
    out
}

fn walk_into<'a>(contents: &'a [Content], out: &mut Vec<&'a Content>) {
    for content in contents {
        out.push(content);
        if let Content::Section(section) = content {
            walk_into(&section.contents, out);
        }
    }
}

/// Every paragraph in the paper, in document order.
pub fn paragraphs(paper: &Paper) -> Vec<&Paragraph> {
    walk(&paper.contents)
        .into_iter()
        .filter_map(Content::as_paragraph)
        .collect()
}

/// Find the content node with the given final (post-reassignment) id.
pub fn find_content<'a>(paper: &'a Paper, id: &ContentId) -> Option<&'a Content> {
    walk(&paper.contents)
        .into_iter()
        .find(|c| c.content_id().is_some_and(|cid| cid == id))
}

/// What a reference marker's resolved target actually refers to.
pub enum Resolved<'a> {
    Bibliography(&'a BibliographyEntry),
    Content(&'a Content),
}

/// Resolve a [`ReferencedId`] against a paper's bibliography and content
/// tree. Returns `None` for a dangling reference -- an id that does not
/// resolve to anything upstream either, see §4.5 Dangling references.
pub fn resolve<'a>(paper: &'a Paper, referenced: &ReferencedId) -> Option<Resolved<'a>> {
    match referenced {
        ReferencedId::Bibliography(i) => paper
            .bibliography
            .iter()
            .find(|entry| entry.bibliography_id as i64 == *i)
            .map(Resolved::Bibliography),
        ReferencedId::Content(id) => find_content(paper, id).map(Resolved::Content),
    }
}

/// True if `paper` has at least one unresolved reference marker.
pub fn has_dangling_references(paper: &Paper) -> bool {
    paragraphs(paper)
        .into_iter()
        .flat_map(|p| p.reference_markers.iter())
        .any(|m| m.referenced_id.is_none())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ReferenceMarker, ReferenceMarkerType, Section};
    use crate::span::{Span, TextSpan};

    fn paper_with_nested_paragraph() -> Paper {
        Paper {
            corpusid: 1,
            bibliography: Vec::new(),
            contents: vec![Content::Section(Section {
                content_id: Some(vec![0]),
                section_level: vec!["1".to_string()],
                header: TextSpan::new("H", Span::new(0, 1)),
                contents: vec![Content::Paragraph(Paragraph {
                    content_id: Some(vec![0, 0]),
                    text_span: TextSpan::new("p", Span::new(2, 3)),
                    reference_markers: vec![ReferenceMarker {
                        text_span: TextSpan::new("[1]", Span::new(2, 5)),
                        reference_marker_type: ReferenceMarkerType::Bibref,
                        referenced_id: None,
                        relative_span: Some(Span::new(0, 3)),
                    }],
                })],
            })],
        }
    }

    #[test]
    fn walk_descends_into_nested_sections() {
        let paper = paper_with_nested_paragraph();
        let all = walk(&paper.contents);
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn paragraphs_finds_nested_paragraph() {
        let paper = paper_with_nested_paragraph();
        assert_eq!(paragraphs(&paper).len(), 1);
    }

    #[test]
    fn find_content_locates_by_final_id() {
        let paper = paper_with_nested_paragraph();
        let found = find_content(&paper, &vec![0, 0]);
        assert!(found.is_some());
        assert!(found.unwrap().is_paragraph());
    }

    #[test]
    fn detects_dangling_reference() {
        let paper = paper_with_nested_paragraph();
        assert!(has_dangling_references(&paper));
    }
}
