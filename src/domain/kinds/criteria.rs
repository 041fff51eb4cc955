use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};

pub const HAS_SELECTED_CRITERIA: &str = "HAS_SELECTED_CRITERIA";
pub const HAS_SELECTED_CRITERIA_TEMPLATE: &str = "HAS_SELECTED_CRITERIA_TEMPLATE";
pub const HAS_CRITERIA_TYPE: &str = "HAS_CRITERIA_TYPE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyCriteriaFields {
    pub criteria_uid: String,
    pub criteria_version: Option<String>,
    pub is_instance: bool,
    pub criteria_type_uid: String,
    pub key_criteria: bool,
}

impl SelectionFields for StudyCriteriaFields {
    const KIND: &'static str = "StudyCriteria";

    fn references(&self) -> Vec<SelectionReference> {
        let (relationship, concept_type) = if self.is_instance {
            (HAS_SELECTED_CRITERIA, "Criteria")
        } else {
            (HAS_SELECTED_CRITERIA_TEMPLATE, "CriteriaTemplate")
        };
        vec![
            SelectionReference::concept(
                relationship,
                concept_type,
                &self.criteria_uid,
                self.criteria_version.clone(),
            ),
            SelectionReference::term(HAS_CRITERIA_TYPE, &self.criteria_type_uid),
        ]
    }
}
