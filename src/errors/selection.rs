//! Study selection error types
//!
//! Covers the aggregate operations, reference resolution during `save()`,
//! and the repository's closure-data contract.
//!
//! # Examples
//!
//! ```rust
//! use studybuilder::errors::SelectionError;
//!
//! let err = SelectionError::SelectionNotFound("StudyObjective_000004".to_string());
//! assert!(err.is_not_found());
//! assert_eq!(err.error_code(), "NOT_FOUND");
//! ```

use thiserror::Error;

use super::versioning::VersioningError;

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("Study {0} not found")]
    StudyNotFound(String),

    #[error("Study {study_uid} has no version {version}")]
    StudyVersionNotFound {
        study_uid: String,
        version: String,
    },

    #[error("Study selection {0} not found")]
    SelectionNotFound(String),

    /// Referenced library concept does not exist
    #[error("{concept_type} {uid} not found")]
    ConceptNotFound { concept_type: String, uid: String },

    /// Concept exists but not in the requested version (or has no final version)
    #[error("{concept_type} {uid} has no version {version}")]
    ConceptVersionNotFound {
        concept_type: String,
        uid: String,
        version: String,
    },

    #[error("Controlled terminology term {0} not found")]
    TermNotFound(String),

    /// The same selection uid appears twice in one list
    #[error("Study selection {0} is already part of the list")]
    DuplicateSelection(String),

    /// The uid was used by a selection that has since been deleted
    #[error("Study selection {0} was deleted earlier and cannot be added again")]
    SelectionUidReused(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Versioning(#[from] VersioningError),

    /// `save()` was called without a preceding `find_by_study(.., true)`
    #[error("save() called for study {0} without closure data from a locked read")]
    MissingClosureData(String),

    #[error("Closure data belongs to study {found}, not {expected}")]
    ClosureMismatch { expected: String, found: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Selection fields could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SelectionError {
    /// Check if this is a client error (400-series)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            SelectionError::DuplicateSelection(_)
                | SelectionError::SelectionUidReused(_)
                | SelectionError::Validation(_)
                | SelectionError::Versioning(_)
        ) || self.is_not_found()
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SelectionError::StudyNotFound(_)
                | SelectionError::StudyVersionNotFound { .. }
                | SelectionError::SelectionNotFound(_)
                | SelectionError::ConceptNotFound { .. }
                | SelectionError::ConceptVersionNotFound { .. }
                | SelectionError::TermNotFound(_)
        )
    }

    /// True when the store reported contention and the transaction may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            SelectionError::Database(err) => {
                crate::common::DbErrorKind::from_db_err(err).is_retryable()
            }
            _ => false,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            SelectionError::StudyNotFound(_)
            | SelectionError::StudyVersionNotFound { .. }
            | SelectionError::SelectionNotFound(_)
            | SelectionError::ConceptNotFound { .. }
            | SelectionError::ConceptVersionNotFound { .. }
            | SelectionError::TermNotFound(_) => "NOT_FOUND",
            SelectionError::DuplicateSelection(_) | SelectionError::SelectionUidReused(_) => {
                "CONFLICT"
            }
            SelectionError::Validation(_) => "VALIDATION_FAILED",
            SelectionError::Versioning(err) => err.error_code(),
            SelectionError::MissingClosureData(_) | SelectionError::ClosureMismatch { .. } => {
                "INTERNAL_ERROR"
            }
            SelectionError::Database(_) => "DATABASE_ERROR",
            SelectionError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }
}
