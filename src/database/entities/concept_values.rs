use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One version of a library concept
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concept_values")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub concept_root_id: i32,
    pub name: String,
    pub version: String,
    pub status: String, // 'Draft', 'Final', 'Retired'
    pub start_date: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::concept_roots::Entity",
        from = "Column::ConceptRootId",
        to = "super::concept_roots::Column::Id",
        on_delete = "Cascade"
    )]
    ConceptRoots,
}

impl Related<super::concept_roots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConceptRoots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
