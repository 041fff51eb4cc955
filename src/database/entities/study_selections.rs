use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One selection list entry at one point in time
///
/// Rows are append-only: an edit writes a new row with the same `uid`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_selections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uid: String,
    pub kind: String,
    #[sea_orm(column_name = "selection_order")]
    pub order: i32,
    pub accepted_version: bool,
    #[sea_orm(column_type = "Json")]
    pub fields: Json,
    pub after_action_id: i32,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_actions::Entity",
        from = "Column::AfterActionId",
        to = "super::study_actions::Column::Id"
    )]
    StudyActions,
    #[sea_orm(has_many = "super::study_value_selections::Entity")]
    StudyValueSelections,
    #[sea_orm(has_many = "super::study_selection_concepts::Entity")]
    StudySelectionConcepts,
    #[sea_orm(has_many = "super::study_selection_terms::Entity")]
    StudySelectionTerms,
}

impl Related<super::study_actions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyActions.def()
    }
}

impl Related<super::study_value_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValueSelections.def()
    }
}

impl Related<super::study_selection_concepts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelectionConcepts.def()
    }
}

impl Related<super::study_selection_terms::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelectionTerms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
