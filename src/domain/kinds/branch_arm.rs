use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};
use crate::errors::SelectionResult;

use super::{require_non_negative, require_text};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyBranchArmFields {
    pub name: String,
    pub short_name: String,
    pub branch_arm_code: Option<String>,
    pub description: Option<String>,
    pub colour_code: Option<String>,
    pub randomization_group: Option<String>,
    pub number_of_subjects: Option<i32>,
    /// Selection uid of the parent study arm
    pub arm_uid: String,
}

impl SelectionFields for StudyBranchArmFields {
    const KIND: &'static str = "StudyBranchArm";

    fn validate(&self) -> SelectionResult<()> {
        require_text("branch arm name", &self.name)?;
        require_text("branch arm short name", &self.short_name)?;
        require_text("arm uid", &self.arm_uid)?;
        require_non_negative("number of subjects", self.number_of_subjects)
    }

    fn references(&self) -> Vec<SelectionReference> {
        Vec::new()
    }
}
