//! C8 -- Leaf Assigner.
//!
//! Two passes. First, paragraphs and formulas are appended to the last
//! section whose header ends before the leaf starts (leaves preceding every
//! section header -- including a document with no headers at all -- land in
//! a synthesized dummy section, kept aside rather than in `sections` yet).
//! Second, each infographic is inserted next to the first paragraph that
//! cites it, scanning only the real (non-dummy) sections, exactly as the
//! original places infographics before the dummy section is prepended;
//! infographics nobody cites are collected into a trailing miscellaneous
//! section. Only after both passes does the dummy section, finalized, join
//! the front of the list.

use crate::model::{Content, ContentId, Infographic, ReferencedId, Section};
use crate::span::{Span, TextSpan};

const DUMMY_HEADER_TEXT: &str = "[[Dummy First Section]]";
const MISC_HEADER_TEXT: &str = "[[Miscellaneous Infographics]]";

/// The sentinel id `[-1]` marks this as the synthesized dummy section
/// holding pre-header leaf content; [`crate::reassign_ids`] overwrites it
/// with a real, non-negative id like every other node.
fn dummy_section() -> Section {
    Section {
        content_id: Some(vec![-1]),
        section_level: vec![String::new()],
        header: TextSpan::synthesized(DUMMY_HEADER_TEXT),
        contents: Vec::new(),
    }
}

/// `sections` must already be in document order (as produced by
/// [`crate::sections::build_sections`]); `leaves` (paragraphs and formulas)
/// need not be sorted. `infographics` are placed in C4 emission order after
/// the first pass completes.
pub fn assign_leaf_content_to_sections(
    mut sections: Vec<Section>,
    mut leaves: Vec<Content>,
    infographics: Vec<Infographic>,
) -> Vec<Section> {
    leaves.sort_by_key(|c| c.original_start().unwrap_or(0));

    let mut dummy: Option<Section> = None;

    for leaf in leaves {
        let start = leaf.original_start().unwrap_or(0);
        let end = leaf.original_end().unwrap_or(start);

        let first_header_start = sections
            .first()
            .and_then(|s| s.header.original_span)
            .map(|s| s.start);

        let goes_to_dummy = match first_header_start {
            Some(fh) => end < fh,
            None => true,
        };

        if goes_to_dummy {
            dummy.get_or_insert_with(dummy_section).contents.push(leaf);
            continue;
        }

        // Last section whose header ends before the leaf starts (§4.8).
        if let Some(idx) = sections
            .iter()
            .rposition(|s| s.header.original_span.is_some_and(|h| h.end < start))
        {
            sections[idx].contents.push(leaf);
        }
        // Else: defensive drop -- should not occur given the dummy branch above.
    }

    if let Some(misc) = place_infographics(&mut sections, infographics) {
        sections.push(misc);
    }

    match dummy {
        Some(mut d) => {
            finalize_dummy(&mut d);
            std::iter::once(d).chain(sections).collect()
        }
        None => sections,
    }
}

/// Set the dummy section's header span to a zero-width span at its first
/// content's start (§4.8 "Dummy section finalization"). The header text was
/// already fixed at creation time.
fn finalize_dummy(dummy: &mut Section) {
    if let Some(start) = dummy.contents.first().and_then(|c| c.original_start()) {
        dummy.header.original_span = Some(Span::zero_width(start));
    }
}

/// Insert each infographic immediately before the next paragraph following
/// its first citing paragraph (or at the section's end if none follows);
/// infographics with no citer anywhere are returned via the miscellaneous
/// section, or `None` if every infographic found a home.
fn place_infographics(sections: &mut [Section], infographics: Vec<Infographic>) -> Option<Section> {
    let mut orphaned: Vec<Infographic> = Vec::new();

    'each_infographic: for infographic in infographics {
        let target = infographic.content_id.clone();
        for section in sections.iter_mut() {
            if let Some(citer_pos) = find_citing_paragraph(&section.contents, target.as_ref()) {
                let insert_at = section.contents[citer_pos + 1..]
                    .iter()
                    .position(Content::is_paragraph)
                    .map(|rel| citer_pos + 1 + rel)
                    .unwrap_or(section.contents.len());
                section.contents.insert(insert_at, Content::Infographic(infographic));
                continue 'each_infographic;
            }
        }
        orphaned.push(infographic);
    }

    if orphaned.is_empty() {
        return None;
    }

    let first_start = orphaned[0]
        .text_span
        .original_span
        .map(|s| s.start)
        .unwrap_or(0);

    Some(Section {
        content_id: None,
        section_level: vec![String::new()],
        header: TextSpan::new(MISC_HEADER_TEXT, Span::zero_width(first_start)),
        contents: orphaned.into_iter().map(Content::Infographic).collect(),
    })
}

fn find_citing_paragraph(contents: &[Content], target: Option<&ContentId>) -> Option<usize> {
    let target = target?;
    contents.iter().position(|c| match c {
        Content::Paragraph(p) => p.reference_markers.iter().any(|m| {
            matches!(&m.referenced_id, Some(ReferencedId::Content(id)) if id == target)
        }),
        _ => false,
    })
}
