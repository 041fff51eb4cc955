//! Study lifecycle errors
//!
//! Raised whenever a mutation conflicts with the study's lock state.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersioningError {
    /// The study's latest value is its locked value; nothing may be written
    #[error("Study {0} is locked and cannot be modified")]
    StudyLocked(String),

    #[error("Study {0} is already locked")]
    AlreadyLocked(String),

    #[error("Study {0} is not locked")]
    NotLocked(String),
}

impl VersioningError {
    pub fn is_client_error(&self) -> bool {
        true
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            VersioningError::StudyLocked(_) => "STUDY_LOCKED",
            VersioningError::AlreadyLocked(_) | VersioningError::NotLocked(_) => "CONFLICT",
        }
    }
}
