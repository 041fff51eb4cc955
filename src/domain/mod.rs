//! In-memory model of study selections
//!
//! Value objects, the per-study aggregate and the positional diff used by
//! the repository when a changed list is saved.

pub mod action;
pub mod aggregate;
pub mod diff;
pub mod kinds;
pub mod vo;

pub use action::ActionType;
pub use aggregate::{ClosureData, StudySelectionAR};
pub use diff::{compute_diff, find_duplicate_uid, SelectionDiff};
pub use vo::{SelectionFields, SelectionReference, SelectionVo};
