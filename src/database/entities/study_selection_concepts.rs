use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_selection_concepts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_selection_id: i32,
    pub relationship: String, // e.g. 'HAS_SELECTED_OBJECTIVE', 'HAS_UNIT'
    pub concept_value_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::study_selections::Entity",
        from = "Column::StudySelectionId",
        to = "super::study_selections::Column::Id"
    )]
    StudySelections,
    #[sea_orm(
        belongs_to = "super::concept_values::Entity",
        from = "Column::ConceptValueId",
        to = "super::concept_values::Column::Id"
    )]
    ConceptValues,
}

impl Related<super::study_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelections.def()
    }
}

impl Related<super::concept_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConceptValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
