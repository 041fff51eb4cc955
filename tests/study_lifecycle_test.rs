//! Study lifecycle integration tests
//!
//! Lock, unlock and release, and the selection lists frozen by each version.

mod common;

use anyhow::Result;
use sea_orm::TransactionTrait;

use common::{arm, setup_study, AUTHOR, PROJECT_NUMBER};
use studybuilder::database::entities::study_value_versions::StudyStatus;
use studybuilder::database::test_utils::setup_test_db;
use studybuilder::domain::SelectionVo;
use studybuilder::errors::{SelectionError, StudyError, VersioningError};
use studybuilder::repositories::{StudyArmRepository, StudyRepository};

async fn add_arm(
    db: &sea_orm::DatabaseConnection,
    repo: &StudyArmRepository,
    study_uid: &str,
    name: &str,
) -> Result<String> {
    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, study_uid, true).await?;
    let uid = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(study_uid, uid.clone(), arm(name), AUTHOR))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;
    Ok(uid)
}

fn names(selections: &[SelectionVo<studybuilder::domain::kinds::StudyArmFields>]) -> Vec<&str> {
    selections.iter().map(|vo| vo.fields.name.as_str()).collect()
}

#[tokio::test]
async fn test_create_study_starts_as_draft() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    assert_eq!(study_uid, "Study_000001");

    let study = StudyRepository::new().find_study(&db, &study_uid).await?;
    assert_eq!(study.status, StudyStatus::Draft);
    assert_eq!(study.project_number.as_deref(), Some(PROJECT_NUMBER));
    assert_eq!(study.project_name.as_deref(), Some("Cardiology"));
    assert_eq!(study.study_acronym.as_deref(), Some("CARD-1"));
    assert_eq!(study.versions.len(), 1);
    assert_eq!(study.versions[0].status, StudyStatus::Draft);
    assert!(study.latest_locked_version.is_none());
    Ok(())
}

#[tokio::test]
async fn test_create_study_requires_project() -> Result<()> {
    let db = setup_test_db().await?;
    let err = StudyRepository::new()
        .create_study(&db, "P-404", None, None, AUTHOR)
        .await
        .unwrap_err();
    assert!(matches!(err, StudyError::ProjectNotFound(_)));
    assert_eq!(err.error_code(), "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn test_lock_freezes_selections() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let studies = StudyRepository::new();
    let arms = StudyArmRepository::new();
    add_arm(&db, &arms, &study_uid, "Alpha").await?;

    let locked = studies
        .lock_study(&db, &study_uid, AUTHOR, "Protocol v1")
        .await?;
    assert_eq!(locked.status, StudyStatus::Locked);
    assert_eq!(locked.latest_locked_version.as_deref(), Some("1"));
    assert_eq!(locked.latest_released_version.as_deref(), Some("1.0"));
    assert!(studies.is_locked(&db, &study_uid).await?);

    let err = studies
        .lock_study(&db, &study_uid, AUTHOR, "again")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StudyError::Versioning(VersioningError::AlreadyLocked(_))
    ));

    let unlocked = studies.unlock_study(&db, &study_uid, AUTHOR).await?;
    assert_eq!(unlocked.status, StudyStatus::Draft);
    add_arm(&db, &arms, &study_uid, "Beta").await?;

    let current = arms.find_by_study(&db, &study_uid, false).await?;
    assert_eq!(names(current.selections()), vec!["Alpha", "Beta"]);

    let frozen = arms.find_by_study_version(&db, &study_uid, "1").await?;
    assert_eq!(names(frozen.selections()), vec!["Alpha"]);
    let frozen = arms.find_by_study_version(&db, &study_uid, "1.0").await?;
    assert_eq!(names(frozen.selections()), vec!["Alpha"]);
    Ok(())
}

#[tokio::test]
async fn test_unlock_requires_lock() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let err = StudyRepository::new()
        .unlock_study(&db, &study_uid, AUTHOR)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StudyError::Versioning(VersioningError::NotLocked(_))
    ));
    assert!(err.is_client_error());
    Ok(())
}

#[tokio::test]
async fn test_release_numbers_follow_locks() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let studies = StudyRepository::new();
    let arms = StudyArmRepository::new();

    add_arm(&db, &arms, &study_uid, "Alpha").await?;
    let released = studies
        .release_study(&db, &study_uid, AUTHOR, "Early draft")
        .await?;
    assert_eq!(released.latest_released_version.as_deref(), Some("0.1"));
    assert_eq!(released.status, StudyStatus::Draft);

    // Changes after a release do not leak into it
    add_arm(&db, &arms, &study_uid, "Beta").await?;
    let frozen = arms.find_by_study_version(&db, &study_uid, "0.1").await?;
    assert_eq!(names(frozen.selections()), vec!["Alpha"]);

    studies.lock_study(&db, &study_uid, AUTHOR, "v1").await?;
    studies.unlock_study(&db, &study_uid, AUTHOR).await?;
    let released = studies
        .release_study(&db, &study_uid, AUTHOR, "Amendment")
        .await?;
    assert_eq!(released.latest_released_version.as_deref(), Some("1.1"));

    let relocked = studies.lock_study(&db, &study_uid, AUTHOR, "v2").await?;
    assert_eq!(relocked.latest_locked_version.as_deref(), Some("2"));
    assert_eq!(relocked.latest_released_version.as_deref(), Some("2.0"));

    let err = studies
        .release_study(&db, &study_uid, AUTHOR, "while locked")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StudyError::Versioning(VersioningError::StudyLocked(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_unknown_version_is_not_found() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let arms = StudyArmRepository::new();

    let err = arms
        .find_by_study_version(&db, &study_uid, "7")
        .await
        .unwrap_err();
    assert!(matches!(err, SelectionError::StudyVersionNotFound { .. }));
    assert!(err.is_not_found());
    Ok(())
}
