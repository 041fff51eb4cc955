use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};

pub const HAS_SELECTED_ACTIVITY: &str = "HAS_SELECTED_ACTIVITY";
pub const HAS_FLOWCHART_GROUP: &str = "HAS_FLOWCHART_GROUP";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyActivityFields {
    pub activity_uid: String,
    pub activity_version: Option<String>,
    pub flowchart_group_uid: Option<String>,
    pub show_activity_in_protocol_flowchart: bool,
    pub note: Option<String>,
}

impl SelectionFields for StudyActivityFields {
    const KIND: &'static str = "StudyActivity";

    fn references(&self) -> Vec<SelectionReference> {
        let mut refs = vec![SelectionReference::concept(
            HAS_SELECTED_ACTIVITY,
            "Activity",
            &self.activity_uid,
            self.activity_version.clone(),
        )];
        if let Some(group) = &self.flowchart_group_uid {
            refs.push(SelectionReference::term(HAS_FLOWCHART_GROUP, group));
        }
        refs
    }
}
