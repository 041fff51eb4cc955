//! Domain-specific error types
//!
//! # Error Categories
//!
//! - **SelectionError**: selection aggregates, reference resolution, `save()` contract
//! - **StudyError**: study roots, values and lifecycle (lock/unlock/release)
//! - **VersioningError**: writes rejected because of the study's lock state
//!
//! Store errors are wrapped without being interpreted. Use
//! [`crate::common::DbErrorKind`] to decide whether a failed transaction can be retried.

pub mod selection;
pub mod study;
pub mod versioning;

pub use selection::SelectionError;
pub use study::StudyError;
pub use versioning::VersioningError;

/// Result type alias for selection operations
pub type SelectionResult<T> = Result<T, SelectionError>;

/// Result type alias for study definition operations
pub type StudyResult<T> = Result<T, StudyError>;
