use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit trail entry of a study root
///
/// Immutable once written. Selection-level actions point `BEFORE` at the
/// superseded selection row through `before_selection_id`; the row they
/// produced points back here through `study_selections.after_action_id`.
/// Study-level actions carry `after_study_value_id` instead.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_actions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_root_id: i32,
    pub action_type: String, // 'Create', 'Edit', 'Delete'
    pub date: ChronoDateTimeUtc,
    pub user_initials: String,
    pub before_selection_id: Option<i32>,
    pub after_study_value_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_roots::Entity",
        from = "Column::StudyRootId",
        to = "super::study_roots::Column::Id"
    )]
    StudyRoots,
    #[sea_orm(has_many = "super::study_selections::Entity")]
    StudySelections,
}

impl Related<super::study_roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyRoots.def()
    }
}

impl Related<super::study_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
