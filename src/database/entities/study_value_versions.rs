use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `HAS_VERSION` history of a study root
///
/// One row per status transition. The row whose `end_date` is `None` is the
/// open entry for that status.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_value_versions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_root_id: i32,
    pub study_value_id: i32,
    pub status: String, // 'DRAFT', 'LOCKED', 'RELEASED'
    pub version: Option<String>,
    pub start_date: ChronoDateTimeUtc,
    pub end_date: Option<ChronoDateTimeUtc>,
    pub author: String,
    pub change_description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StudyStatus {
    Draft,
    Locked,
    Released,
}

impl StudyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StudyStatus::Draft => "DRAFT",
            StudyStatus::Locked => "LOCKED",
            StudyStatus::Released => "RELEASED",
        }
    }
}

impl From<String> for StudyStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LOCKED" => StudyStatus::Locked,
            "RELEASED" => StudyStatus::Released,
            _ => StudyStatus::Draft,
        }
    }
}

impl From<StudyStatus> for String {
    fn from(status: StudyStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_roots::Entity",
        from = "Column::StudyRootId",
        to = "super::study_roots::Column::Id"
    )]
    StudyRoots,
    #[sea_orm(
        belongs_to = "super::study_values::Entity",
        from = "Column::StudyValueId",
        to = "super::study_values::Column::Id"
    )]
    StudyValues,
}

impl Related<super::study_roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyRoots.def()
    }
}

impl Related<super::study_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
