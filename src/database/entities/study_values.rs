use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Immutable snapshot of study-level state
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_root_id: i32,
    pub project_id: Option<i32>,
    pub study_number: Option<String>,
    pub study_acronym: Option<String>,
    pub created_at: ChronoDateTimeUtc,
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
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id"
    )]
    Projects,
    #[sea_orm(has_many = "super::study_value_selections::Entity")]
    StudyValueSelections,
}

impl Related<super::study_roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyRoots.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::study_value_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValueSelections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
