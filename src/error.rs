//! Error types for the content graph engine.
//!
//! Every fallible public operation returns [`EngineError`]. Validation and
//! lookup failures are structured results, never logged-and-swallowed; a
//! batch rejection carries the complete list of per-record failures so a
//! caller can surface every problem in one pass.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{EntityKind, NavigationMode};

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input, e.g. an empty identifier-generation handle.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Lookup by an identifier that does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// A referential or uniqueness invariant was violated.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// One or more records in a batch failed validation; nothing was
    /// persisted.
    #[error("batch rejected: {} record(s) failed validation", .0.len())]
    Batch(Vec<BatchFailure>),

    /// Navigation mode is not declared in the set's `supported_navigation`.
    #[error("navigation mode '{mode}' not supported by set {set_id}")]
    UnsupportedMode {
        set_id: String,
        mode: NavigationMode,
    },

    /// A persisted container is unreadable, unwritable, or corrupt.
    #[error("storage error: {0}")]
    Storage(String),
}

impl EngineError {
    /// Build a `Storage` error that names the offending container path.
    pub(crate) fn storage(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        EngineError::Storage(format!("{}: {}", path.display(), err))
    }

    pub(crate) fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            kind,
            id: id.into(),
        }
    }
}

/// A single rejected record within a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchFailure {
    /// Identifier of the rejected record.
    pub record_id: String,

    /// Why validation rejected it.
    pub reason: String,
}

impl BatchFailure {
    pub fn new(record_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_error_counts_failures() {
        let err = EngineError::Batch(vec![
            BatchFailure::new("a", "dangling creator_id"),
            BatchFailure::new("b", "duplicate order_index"),
        ]);
        assert!(err.to_string().contains("2 record(s)"));
    }

    #[test]
    fn test_not_found_names_kind_and_id() {
        let err = EngineError::not_found(EntityKind::Card, "missing_card");
        let msg = err.to_string();
        assert!(msg.contains("card"));
        assert!(msg.contains("missing_card"));
    }
}
