use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};
use crate::errors::SelectionResult;

use super::{require_non_negative, require_text};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyCohortFields {
    pub name: String,
    pub short_name: String,
    pub cohort_code: Option<String>,
    pub description: Option<String>,
    pub colour_code: Option<String>,
    pub number_of_subjects: Option<i32>,
    pub arm_uids: Vec<String>,
    pub branch_arm_uids: Vec<String>,
}

impl SelectionFields for StudyCohortFields {
    const KIND: &'static str = "StudyCohort";

    fn validate(&self) -> SelectionResult<()> {
        require_text("cohort name", &self.name)?;
        require_text("cohort short name", &self.short_name)?;
        require_non_negative("number of subjects", self.number_of_subjects)
    }

    fn references(&self) -> Vec<SelectionReference> {
        Vec::new()
    }
}
