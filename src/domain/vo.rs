use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::errors::SelectionResult;

/// A library object a selection points at
///
/// Resolved by the repository while a new selection row is written; an
/// unresolvable reference aborts the save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionReference {
    /// Versioned library concept. `version: None` selects the latest final version.
    Concept {
        relationship: &'static str,
        concept_type: &'static str,
        uid: String,
        version: Option<String>,
    },
    /// Controlled terminology term root
    Term {
        relationship: &'static str,
        term_uid: String,
    },
}

impl SelectionReference {
    pub fn concept(
        relationship: &'static str,
        concept_type: &'static str,
        uid: impl Into<String>,
        version: Option<String>,
    ) -> Self {
        SelectionReference::Concept {
            relationship,
            concept_type,
            uid: uid.into(),
            version,
        }
    }

    pub fn term(relationship: &'static str, term_uid: impl Into<String>) -> Self {
        SelectionReference::Term {
            relationship,
            term_uid: term_uid.into(),
        }
    }

    pub fn relationship(&self) -> &'static str {
        match self {
            SelectionReference::Concept { relationship, .. }
            | SelectionReference::Term { relationship, .. } => relationship,
        }
    }
}

/// Kind-specific part of a selection
///
/// One implementation per selection kind. `KIND` is stored on every row and
/// doubles as the uid counter label.
pub trait SelectionFields:
    Clone + Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: &'static str;

    fn validate(&self) -> SelectionResult<()> {
        Ok(())
    }

    fn references(&self) -> Vec<SelectionReference>;
}

/// Immutable snapshot of one selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionVo<F> {
    pub study_uid: String,
    pub study_selection_uid: String,
    pub accepted_version: bool,
    pub start_date: DateTime<Utc>,
    pub user_initials: String,
    pub fields: F,
}

impl<F: SelectionFields> SelectionVo<F> {
    pub fn new(
        study_uid: impl Into<String>,
        study_selection_uid: impl Into<String>,
        fields: F,
        user_initials: impl Into<String>,
    ) -> Self {
        Self {
            study_uid: study_uid.into(),
            study_selection_uid: study_selection_uid.into(),
            accepted_version: false,
            start_date: Utc::now(),
            user_initials: user_initials.into(),
            fields,
        }
    }

    /// Same persisted content. Audit metadata (`start_date`, `user_initials`) is ignored.
    pub fn same_content(&self, other: &Self) -> bool {
        self.study_selection_uid == other.study_selection_uid
            && self.accepted_version == other.accepted_version
            && self.fields == other.fields
    }

    pub fn with_fields(&self, fields: F, user_initials: impl Into<String>) -> Self {
        Self {
            fields,
            accepted_version: false,
            start_date: Utc::now(),
            user_initials: user_initials.into(),
            ..self.clone()
        }
    }

    pub fn accepted(&self, user_initials: impl Into<String>) -> Self {
        Self {
            accepted_version: true,
            start_date: Utc::now(),
            user_initials: user_initials.into(),
            ..self.clone()
        }
    }
}
