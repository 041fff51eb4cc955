//! Selection kinds
//!
//! Each kind contributes the fields stored on its selection rows and the
//! library references those fields resolve to.

pub mod activity;
pub mod arm;
pub mod branch_arm;
pub mod cohort;
pub mod compound;
pub mod criteria;
pub mod element;
pub mod endpoint;
pub mod objective;

pub use activity::StudyActivityFields;
pub use arm::StudyArmFields;
pub use branch_arm::StudyBranchArmFields;
pub use cohort::StudyCohortFields;
pub use compound::StudyCompoundFields;
pub use criteria::StudyCriteriaFields;
pub use element::StudyElementFields;
pub use endpoint::StudyEndpointFields;
pub use objective::StudyObjectiveFields;

use crate::errors::{SelectionError, SelectionResult};

pub(crate) fn require_text(field: &str, value: &str) -> SelectionResult<()> {
    if value.trim().is_empty() {
        return Err(SelectionError::Validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: Option<i32>) -> SelectionResult<()> {
    match value {
        Some(n) if n < 0 => Err(SelectionError::Validation(format!(
            "{} must not be negative, got {}",
            field, n
        ))),
        _ => Ok(()),
    }
}
