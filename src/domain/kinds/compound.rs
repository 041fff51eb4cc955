use serde::{Deserialize, Serialize};

use crate::domain::vo::{SelectionFields, SelectionReference};

pub const HAS_SELECTED_COMPOUND: &str = "HAS_SELECTED_COMPOUND";
pub const HAS_TYPE_OF_TREATMENT: &str = "HAS_TYPE_OF_TREATMENT";
pub const HAS_DOSE_FREQUENCY: &str = "HAS_DOSE_FREQUENCY";
pub const HAS_DELIVERY_DEVICE: &str = "HAS_DELIVERY_DEVICE";
pub const HAS_DISPENSER: &str = "HAS_DISPENSER";
pub const HAS_REASON_FOR_MISSING: &str = "HAS_REASON_FOR_MISSING";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyCompoundFields {
    /// Unset when only a reason for the missing compound is recorded
    pub compound_uid: Option<String>,
    pub compound_version: Option<String>,
    pub other_information: Option<String>,
    pub type_of_treatment_uid: Option<String>,
    pub dose_frequency_uid: Option<String>,
    pub delivery_device_uid: Option<String>,
    pub dispenser_uid: Option<String>,
    pub reason_for_missing_uid: Option<String>,
}

impl SelectionFields for StudyCompoundFields {
    const KIND: &'static str = "StudyCompound";

    fn references(&self) -> Vec<SelectionReference> {
        let mut refs = Vec::new();
        if let Some(uid) = &self.compound_uid {
            refs.push(SelectionReference::concept(
                HAS_SELECTED_COMPOUND,
                "Compound",
                uid,
                self.compound_version.clone(),
            ));
        }
        let terms = [
            (HAS_TYPE_OF_TREATMENT, &self.type_of_treatment_uid),
            (HAS_DOSE_FREQUENCY, &self.dose_frequency_uid),
            (HAS_DELIVERY_DEVICE, &self.delivery_device_uid),
            (HAS_DISPENSER, &self.dispenser_uid),
            (HAS_REASON_FOR_MISSING, &self.reason_for_missing_uid),
        ];
        refs.extend(terms.into_iter().filter_map(|(relationship, uid)| {
            uid.as_ref()
                .map(|uid| SelectionReference::term(relationship, uid))
        }));
        refs
    }
}
