use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};
use crate::errors::SelectionResult;

use super::require_text;

pub const HAS_ELEMENT_SUBTYPE: &str = "HAS_ELEMENT_SUBTYPE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyElementFields {
    pub name: String,
    pub short_name: String,
    pub element_code: Option<String>,
    pub description: Option<String>,
    /// Free text such as "P14D"
    pub planned_duration: Option<String>,
    pub start_rule: Option<String>,
    pub end_rule: Option<String>,
    pub element_colour: Option<String>,
    pub element_subtype_uid: Option<String>,
}

impl SelectionFields for StudyElementFields {
    const KIND: &'static str = "StudyElement";

    fn validate(&self) -> SelectionResult<()> {
        require_text("element name", &self.name)?;
        require_text("element short name", &self.short_name)
    }

    fn references(&self) -> Vec<SelectionReference> {
        self.element_subtype_uid
            .iter()
            .map(|uid| SelectionReference::term(HAS_ELEMENT_SUBTYPE, uid))
            .collect()
    }
}
