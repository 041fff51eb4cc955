use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};
use crate::errors::SelectionResult;

use super::{require_non_negative, require_text};

pub const HAS_ARM_TYPE: &str = "HAS_ARM_TYPE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyArmFields {
    pub name: String,
    pub short_name: String,
    pub arm_code: Option<String>,
    pub description: Option<String>,
    pub arm_colour: Option<String>,
    pub randomization_group: Option<String>,
    pub number_of_subjects: Option<i32>,
    pub arm_type_uid: Option<String>,
}

impl SelectionFields for StudyArmFields {
    const KIND: &'static str = "StudyArm";

    fn validate(&self) -> SelectionResult<()> {
        require_text("arm name", &self.name)?;
        require_text("arm short name", &self.short_name)?;
        require_non_negative("number of subjects", self.number_of_subjects)
    }

    fn references(&self) -> Vec<SelectionReference> {
        self.arm_type_uid
            .iter()
            .map(|uid| SelectionReference::term(HAS_ARM_TYPE, uid))
            .collect()
    }
}
