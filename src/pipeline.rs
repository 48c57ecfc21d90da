//! Global pipeline orchestration.
//!
//! Runs the ten components in order over one upstream record, threading the
//! transient id-map through the three that share it (C2, C4, C5) and the
//! `done` index set through the three that claim annotation indices (C4,
//! C6, C7).

use tracing::{instrument, warn};

use crate::annotation::sanitize_annotations;
use crate::bibliography::build_bibliography;
use crate::collect::collect_content_annotations;
use crate::error::BuildError;
use crate::idmap::IdMap;
use crate::input::RawPaper;
use crate::leaf_assign::assign_leaf_content_to_sections;
use crate::leaf_content::build_leaf_content;
use crate::model::{Content, Paper};
use crate::nest::nest_sections;
use crate::paragraphs::build_paragraphs;
use crate::reassign_ids::reassign_content_ids;
use crate::reference_markers::build_reference_markers;
use crate::sections::build_sections;

/// Build a [`Paper`] from one upstream record.
///
/// Returns [`BuildError::CorruptRecord`] only for record-shape problems the
/// host should treat as a hard failure (§7); every span-level annotation
/// problem is recovered from internally and logged instead.
#[instrument(skip_all)]
pub fn build_paper(raw: RawPaper) -> Result<Paper, BuildError> {
    let corpusid = raw.corpusid.as_i64().ok_or_else(|| {
        BuildError::CorruptRecord(format!("corpusid is not an integer: {}", raw.corpusid))
    })?;

    let raw_text = raw.content.text.unwrap_or_default();
    if raw_text.is_empty() {
        warn!(corpusid, "paper has empty text; producing a bibliography-only paper");
    }

    let annotations = sanitize_annotations(&raw.content.annotations, raw_text.len());

    let mut id_map: IdMap = IdMap::new();
    let bibliography = build_bibliography(&annotations, &raw_text, &mut id_map);

    let content_annotations = collect_content_annotations(&annotations);
    let (infographics, formulas, mut done) =
        build_leaf_content(&content_annotations, &raw_text, &mut id_map);

    let reference_markers = build_reference_markers(&annotations, &raw_text, &id_map);
    let paragraphs = build_paragraphs(&content_annotations, &reference_markers, &raw_text, &mut done);

    let sections = build_sections(&content_annotations, &raw_text, &mut done);

    let mut leaves: Vec<Content> = Vec::new();
    leaves.extend(paragraphs.into_iter().map(Content::Paragraph));
    leaves.extend(formulas.into_iter().map(Content::Formula));

    let assigned = assign_leaf_content_to_sections(sections, leaves, infographics);
    let nested = nest_sections(assigned);

    let mut contents: Vec<Content> = nested.into_iter().map(Content::Section).collect();
    reassign_content_ids(&mut contents);

    Ok(Paper {
        corpusid,
        contents,
        bibliography,
    })
}
