use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Library concept identity (objective, endpoint, timeframe, unit, ...)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "concept_roots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub uid: String,
    pub concept_type: String,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::concept_values::Entity")]
    ConceptValues,
}

impl Related<super::concept_values::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConceptValues.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
