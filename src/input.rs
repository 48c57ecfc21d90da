//! The raw record shape the core expects from its host (§6 External
//! Interfaces). The core neither reads these from disk nor writes them --
//! that is the host collaborator's job -- it only deserializes one record
//! at a time via `serde`.

use serde::Deserialize;
use serde_json::Value;

use crate::annotation::RawAnnotations;

/// One upstream paper record, pre-deserialization validation.
///
/// `corpusid` is kept as a raw [`Value`] rather than `i64` because a
/// malformed record (missing or non-integer `corpusid`) must be turned into
/// a [`crate::error::BuildError::CorruptRecord`] rather than a `serde`
/// deserialization failure -- the distinction between "this JSON is not
/// well-formed" and "this JSON is well-formed but not a paper" matters to
/// the host (see §7, CorruptRecord).
#[derive(Debug, Clone, Deserialize)]
pub struct RawPaper {
    pub corpusid: Value,
    pub content: RawContent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContent {
    pub text: Option<String>,
    #[serde(default)]
    pub annotations: RawAnnotations,
}
