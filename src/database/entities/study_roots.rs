use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Identity row for one study
///
/// Never deleted. The three `latest_*` columns are the current pointers into
/// `study_values`; `write_lock` / `write_lock_generation` are touched by every
/// mutating transaction to serialize writers on this row.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_roots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uid: String,
    pub write_lock: Option<String>,
    pub write_lock_generation: i64,
    pub latest_value_id: Option<i32>,
    pub latest_locked_value_id: Option<i32>,
    pub latest_released_value_id: Option<i32>,
    pub created_at: ChronoDateTimeUtc,
}

impl Model {
    /// The current value is the locked snapshot
    pub fn is_locked(&self) -> bool {
        self.latest_value_id.is_some() && self.latest_value_id == self.latest_locked_value_id
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::study_values::Entity")]
    StudyValues,
    #[sea_orm(has_many = "super::study_value_versions::Entity")]
    StudyValueVersions,
    #[sea_orm(has_many = "super::study_actions::Entity")]
    StudyActions,
}

impl Related<super::study_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValues.def()
    }
}

impl Related<super::study_value_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValueVersions.def()
    }
}

impl Related<super::study_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyActions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
