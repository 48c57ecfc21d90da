//! Error taxonomy for the structural reconstruction pipeline.
//!
//! Most anomalies the pipeline encounters are recoverable: a malformed
//! annotation, an unresolved reference, an orphaned figure. Those are logged
//! via `tracing::warn!` and the pipeline keeps going (see the individual
//! component modules). The only condition that aborts a paper outright is a
//! [`BuildError::CorruptRecord`] -- the record is not shaped like a paper at
//! all, and there is nothing for the pipeline to reconstruct.

use std::fmt;

/// Failure returned by [`crate::pipeline::build_paper`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The raw record lacks an integer `corpusid`, or is otherwise not a
    /// recognizable paper record.
    CorruptRecord(String),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::CorruptRecord(reason) => write!(f, "corrupt paper record: {reason}"),
        }
    }
}

impl std::error::Error for BuildError {}
