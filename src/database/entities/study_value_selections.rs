use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Current membership of a selection row in a study value (`HAS_STUDY_<X>`)
///
/// The only rows in the selection model that are ever deleted.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_value_selections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_value_id: i32,
    pub study_selection_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_values::Entity",
        from = "Column::StudyValueId",
        to = "super::study_values::Column::Id"
    )]
    StudyValues,
    #[sea_orm(
        belongs_to = "super::study_selections::Entity",
        from = "Column::StudySelectionId",
        to = "super::study_selections::Column::Id"
    )]
    StudySelections,
}

impl Related<super::study_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudyValues.def()
    }
}

impl Related<super::study_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelections.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
