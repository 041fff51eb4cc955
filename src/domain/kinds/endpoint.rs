use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};
use crate::errors::{SelectionError, SelectionResult};

pub const HAS_SELECTED_ENDPOINT: &str = "HAS_SELECTED_ENDPOINT";
pub const HAS_SELECTED_ENDPOINT_TEMPLATE: &str = "HAS_SELECTED_ENDPOINT_TEMPLATE";
pub const HAS_SELECTED_TIMEFRAME: &str = "HAS_SELECTED_TIMEFRAME";
pub const HAS_UNIT: &str = "HAS_UNIT";
pub const HAS_ENDPOINT_LEVEL: &str = "HAS_ENDPOINT_LEVEL";
pub const HAS_ENDPOINT_SUB_LEVEL: &str = "HAS_ENDPOINT_SUB_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyEndpointFields {
    pub endpoint_uid: Option<String>,
    pub endpoint_version: Option<String>,
    pub is_instance: bool,
    pub timeframe_uid: Option<String>,
    pub timeframe_version: Option<String>,
    /// Unit definition uids, in display order
    pub endpoint_units: Vec<String>,
    pub unit_separator: Option<String>,
    /// Selection uid of the study objective this endpoint measures
    pub study_objective_uid: Option<String>,
    pub endpoint_level_uid: Option<String>,
    pub endpoint_sublevel_uid: Option<String>,
}

impl SelectionFields for StudyEndpointFields {
    const KIND: &'static str = "StudyEndpoint";

    fn validate(&self) -> SelectionResult<()> {
        let has_separator = self
            .unit_separator
            .as_deref()
            .is_some_and(|sep| !sep.is_empty());
        if self.endpoint_units.len() > 1 && !has_separator {
            return Err(SelectionError::Validation(
                "a unit separator is required when more than one unit is selected".to_string(),
            ));
        }
        if has_separator && self.endpoint_units.len() < 2 {
            return Err(SelectionError::Validation(
                "a unit separator needs at least two units".to_string(),
            ));
        }
        Ok(())
    }

    fn references(&self) -> Vec<SelectionReference> {
        let mut refs = Vec::new();
        if let Some(uid) = &self.endpoint_uid {
            refs.push(if self.is_instance {
                SelectionReference::concept(
                    HAS_SELECTED_ENDPOINT,
                    "Endpoint",
                    uid,
                    self.endpoint_version.clone(),
                )
            } else {
                SelectionReference::concept(
                    HAS_SELECTED_ENDPOINT_TEMPLATE,
                    "EndpointTemplate",
                    uid,
                    self.endpoint_version.clone(),
                )
            });
        }
        if let Some(uid) = &self.timeframe_uid {
            refs.push(SelectionReference::concept(
                HAS_SELECTED_TIMEFRAME,
                "Timeframe",
                uid,
                self.timeframe_version.clone(),
            ));
        }
        refs.extend(
            self.endpoint_units
                .iter()
                .map(|unit| SelectionReference::concept(HAS_UNIT, "UnitDefinition", unit, None)),
        );
        if let Some(level) = &self.endpoint_level_uid {
            refs.push(SelectionReference::term(HAS_ENDPOINT_LEVEL, level));
        }
        if let Some(sublevel) = &self.endpoint_sublevel_uid {
            refs.push(SelectionReference::term(HAS_ENDPOINT_SUB_LEVEL, sublevel));
        }
        refs
    }
}
