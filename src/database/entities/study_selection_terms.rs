use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "study_selection_terms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub study_selection_id: i32,
    pub relationship: String, // e.g. 'HAS_OBJECTIVE_LEVEL'
    pub ct_term_root_id: i32,
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
        belongs_to = "super::ct_term_roots::Entity",
        from = "Column::CtTermRootId",
        to = "super::ct_term_roots::Column::Id"
    )]
    CtTermRoots,
}

impl Related<super::study_selections::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudySelections.def()
    }
}

impl Related<super::ct_term_roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CtTermRoots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
