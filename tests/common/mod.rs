#![allow(dead_code)]

use std::path::Path;

use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use sea_orm::sea_query::JoinType;

use studybuilder::database::entities::{
    study_actions, study_roots, study_selections, study_value_selections,
};
use sea_orm_migration::MigratorTrait;
use studybuilder::database::migrations::Migrator;
use studybuilder::database::test_utils::setup_test_db;
use studybuilder::database::{establish_connection, get_database_url};
use studybuilder::domain::kinds::{StudyArmFields, StudyObjectiveFields};
use studybuilder::repositories::{LibraryRepository, StudyRepository};

pub const AUTHOR: &str = "AB";
pub const PROJECT_NUMBER: &str = "P-001";

/// Fresh database with one project and one draft study
pub async fn setup_study() -> Result<(DatabaseConnection, String)> {
    let db = setup_test_db().await?;
    let study_uid = create_draft_study(&db).await?;
    Ok((db, study_uid))
}

/// Same fixture on a SQLite file, with a pool that lets transactions overlap
pub async fn setup_file_study(path: &Path) -> Result<(DatabaseConnection, String)> {
    let url = get_database_url(path.to_str());
    let db = establish_connection(&url, 4).await?;
    Migrator::up(&db, None).await?;
    let study_uid = create_draft_study(&db).await?;
    Ok((db, study_uid))
}

async fn create_draft_study(db: &DatabaseConnection) -> Result<String> {
    let studies = StudyRepository::new();
    studies
        .create_project(db, PROJECT_NUMBER, "Cardiology")
        .await?;
    let study = studies
        .create_study(db, PROJECT_NUMBER, Some("1001"), Some("CARD-1"), AUTHOR)
        .await?;
    Ok(study.uid)
}

/// Library content referenced by the objective fixtures
pub async fn seed_library(db: &DatabaseConnection) -> Result<()> {
    let library = LibraryRepository::new();
    library
        .create_concept(db, "Objective", "Objective_000001", "Assess safety")
        .await?;
    library
        .create_concept(db, "Objective", "Objective_000002", "Assess efficacy")
        .await?;
    library
        .create_ct_term(db, "C85826_OBJPRIM", "Primary Objective", Some("C66736"))
        .await?;
    Ok(())
}

pub fn arm(name: &str) -> StudyArmFields {
    StudyArmFields {
        name: name.to_string(),
        short_name: name.to_lowercase(),
        ..Default::default()
    }
}

pub fn objective(concept_uid: &str) -> StudyObjectiveFields {
    StudyObjectiveFields {
        objective_uid: concept_uid.to_string(),
        objective_version: None,
        is_instance: true,
        objective_level_uid: Some("C85826_OBJPRIM".to_string()),
    }
}

/// Row counts of the append-only selection tables and the membership table
#[derive(Debug, PartialEq, Eq)]
pub struct RowCounts {
    pub selections: u64,
    pub actions: u64,
    pub memberships: u64,
}

pub async fn row_counts(db: &DatabaseConnection) -> Result<RowCounts> {
    Ok(RowCounts {
        selections: study_selections::Entity::find().count(db).await?,
        actions: study_actions::Entity::find().count(db).await?,
        memberships: study_value_selections::Entity::find().count(db).await?,
    })
}

/// `(uid, order)` of rows attached to the study's current value, by order
pub async fn current_rows(
    db: &DatabaseConnection,
    study_uid: &str,
    kind: &str,
) -> Result<Vec<(String, i32)>> {
    let root = study_roots::Entity::find()
        .filter(study_roots::Column::Uid.eq(study_uid))
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("study {} missing", study_uid))?;

    let rows = study_selections::Entity::find()
        .join(
            JoinType::InnerJoin,
            study_selections::Relation::StudyValueSelections.def(),
        )
        .filter(study_value_selections::Column::StudyValueId.eq(root.latest_value_id))
        .filter(study_selections::Column::Kind.eq(kind))
        .order_by_asc(study_selections::Column::Order)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|row| (row.uid, row.order)).collect())
}
