use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};

pub const HAS_SELECTED_OBJECTIVE: &str = "HAS_SELECTED_OBJECTIVE";
pub const HAS_SELECTED_OBJECTIVE_TEMPLATE: &str = "HAS_SELECTED_OBJECTIVE_TEMPLATE";
pub const HAS_OBJECTIVE_LEVEL: &str = "HAS_OBJECTIVE_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyObjectiveFields {
    pub objective_uid: String,
    pub objective_version: Option<String>,
    /// `false` while only the template has been chosen
    pub is_instance: bool,
    pub objective_level_uid: Option<String>,
}

impl SelectionFields for StudyObjectiveFields {
    const KIND: &'static str = "StudyObjective";

    fn references(&self) -> Vec<SelectionReference> {
        let mut refs = vec![if self.is_instance {
            SelectionReference::concept(
                HAS_SELECTED_OBJECTIVE,
                "Objective",
                &self.objective_uid,
                self.objective_version.clone(),
            )
        } else {
            SelectionReference::concept(
                HAS_SELECTED_OBJECTIVE_TEMPLATE,
                "ObjectiveTemplate",
                &self.objective_uid,
                self.objective_version.clone(),
            )
        }];
        if let Some(level) = &self.objective_level_uid {
            refs.push(SelectionReference::term(HAS_OBJECTIVE_LEVEL, level));
        }
        refs
    }
}
