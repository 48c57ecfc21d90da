//! The reconstructed document model: bibliography, reference markers, and
//! the recursive section/leaf content tree.

use serde::{Deserialize, Serialize};

use crate::span::{Span, TextSpan};

/// A root-to-node path in the final section tree.
///
/// Ordering is lexicographic; shorter prefixes are ancestors. Provisional
/// ids assigned before [`crate::reassign_ids`] runs may contain negative
/// entries (the dummy-first-section sentinel is `[-1]`); every id in the
/// *final* tree is non-negative.
pub type ContentId = Vec<i64>;

/// What a reference marker resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReferencedId {
    /// A `bibref` target: an index into [`Paper::bibliography`].
    Bibliography(i64),
    /// A `figureref`/`tableref` target: the [`ContentId`] of an `Infographic`.
    Content(ContentId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMarkerType {
    Bibref,
    Figureref,
    Tableref,
}

/// An in-text citation or cross-reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceMarker {
    pub text_span: TextSpan,
    pub reference_marker_type: ReferenceMarkerType,
    pub referenced_id: Option<ReferencedId>,
    /// Offsets relative to the enclosing paragraph's span; `None` until the
    /// marker has been bound to a paragraph.
    pub relative_span: Option<Span>,
}

impl ReferenceMarker {
    pub fn original_span(&self) -> Option<Span> {
        self.text_span.original_span
    }
}

/// One entry in the paper's bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibliographyEntry {
    pub text_span: TextSpan,
    pub bibliography_id: usize,
    pub corpusid: Option<i64>,
    pub original_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfographicKind {
    Figure,
    Table,
}

/// A non-section entry in the tree: paragraph, formula, or infographic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", rename_all = "lowercase")]
pub enum Content {
    Section(Section),
    Paragraph(Paragraph),
    Formula(Formula),
    Infographic(Infographic),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub content_id: Option<ContentId>,
    /// Dotted numbering components, e.g. `["2", "1"]` for "2.1". Every
    /// component is alphanumeric (possibly empty for sections with no
    /// inferable numbering).
    pub section_level: Vec<String>,
    pub header: TextSpan,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content_id: Option<ContentId>,
    pub text_span: TextSpan,
    pub reference_markers: Vec<ReferenceMarker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formula {
    pub content_id: Option<ContentId>,
    pub text_span: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Infographic {
    pub content_id: Option<ContentId>,
    pub kind: InfographicKind,
    pub text_span: TextSpan,
    pub header: TextSpan,
    pub caption: TextSpan,
}

impl Content {
    pub fn content_id(&self) -> Option<&ContentId> {
        match self {
            Content::Section(s) => s.content_id.as_ref(),
            Content::Paragraph(p) => p.content_id.as_ref(),
            Content::Formula(f) => f.content_id.as_ref(),
            Content::Infographic(i) => i.content_id.as_ref(),
        }
    }

    pub fn set_content_id(&mut self, id: ContentId) {
        let slot = match self {
            Content::Section(s) => &mut s.content_id,
            Content::Paragraph(p) => &mut p.content_id,
            Content::Formula(f) => &mut f.content_id,
            Content::Infographic(i) => &mut i.content_id,
        };
        *slot = Some(id);
    }

    /// The start of the original span this content occupies, used for
    /// ordering. Synthesized entries (ancestor sections, the dummy section)
    /// carry a zero-width span at their synthesized position.
    pub fn original_start(&self) -> Option<usize> {
        self.text_span().original_span.map(|s| s.start)
    }

    /// The end of the original span this content occupies; see
    /// [`Content::original_start`].
    pub fn original_end(&self) -> Option<usize> {
        self.text_span().original_span.map(|s| s.end)
    }

    fn text_span(&self) -> &TextSpan {
        match self {
            Content::Section(s) => &s.header,
            Content::Paragraph(p) => &p.text_span,
            Content::Formula(f) => &f.text_span,
            Content::Infographic(i) => &i.text_span,
        }
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Content::Paragraph(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_section_mut(&mut self) -> Option<&mut Section> {
        match self {
            Content::Section(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_paragraph(&self) -> bool {
        matches!(self, Content::Paragraph(_))
    }

    pub fn is_section(&self) -> bool {
        matches!(self, Content::Section(_))
    }
}

/// Metadata joined from outside the core (title/year lookup by corpus id).
///
/// The core never produces this itself -- see [`Paper::with_metadata`] --
/// it exists only so a host collaborator has a typed place to attach a join
/// result without reaching into the core's internals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataStub {
    pub corpusid: i64,
    pub title: Option<String>,
    pub year: Option<u32>,
}

/// The fully reconstructed paper: a section tree plus a bibliography.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub corpusid: i64,
    pub contents: Vec<Content>,
    pub bibliography: Vec<BibliographyEntry>,
}

/// A `Paper` with metadata attached by a host collaborator after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperWithMetadata {
    #[serde(flatten)]
    pub metadata: MetadataStub,
    #[serde(flatten)]
    pub paper: Paper,
}

impl Paper {
    /// Attach metadata joined by a host collaborator (title/year lookup).
    /// The core itself never performs this join; see §1 Out of scope.
    pub fn with_metadata(self, title: Option<String>, year: Option<u32>) -> PaperWithMetadata {
        PaperWithMetadata {
            metadata: MetadataStub {
                corpusid: self.corpusid,
                title,
                year,
            },
            paper: self,
        }
    }
}
