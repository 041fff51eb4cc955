//! Selection repository integration tests
//!
//! Save, diff and audit trail behaviour against an in-memory database.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use common::{
    arm, current_rows, objective, row_counts, seed_library, setup_file_study, setup_study, AUTHOR,
};
use studybuilder::database::entities::{
    concept_values, study_roots, study_selection_concepts, study_selection_terms,
    study_selections,
};
use studybuilder::domain::kinds::StudyArmFields;
use studybuilder::domain::{ActionType, SelectionFields, SelectionVo};
use studybuilder::errors::{SelectionError, VersioningError};
use studybuilder::repositories::{
    acquire_write_lock, LibraryRepository, SelectionFilter, StudyArmRepository,
    StudyObjectiveRepository, StudyRepository,
};

const ARM: &str = StudyArmFields::KIND;

async fn add_arms(
    db: &DatabaseConnection,
    repo: &StudyArmRepository,
    study_uid: &str,
    names: &[&str],
) -> Result<Vec<String>> {
    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, study_uid, true).await?;
    let mut uids = Vec::new();
    for name in names {
        let uid = repo.generate_uid(&txn).await?;
        aggregate.add_selection(SelectionVo::new(study_uid, uid.clone(), arm(name), AUTHOR))?;
        uids.push(uid);
    }
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;
    Ok(uids)
}

/// Concept versions and term count linked to every stored row of `selection_uid`, oldest first
async fn stored_links(
    db: &DatabaseConnection,
    selection_uid: &str,
) -> Result<Vec<(Vec<String>, usize)>> {
    let rows = study_selections::Entity::find()
        .filter(study_selections::Column::Uid.eq(selection_uid))
        .order_by_asc(study_selections::Column::Id)
        .all(db)
        .await?;

    let mut links = Vec::new();
    for row in rows {
        let versions = study_selection_concepts::Entity::find()
            .find_also_related(concept_values::Entity)
            .filter(study_selection_concepts::Column::StudySelectionId.eq(row.id))
            .all(db)
            .await?
            .into_iter()
            .filter_map(|(_, value)| value.map(|v| v.version))
            .collect();
        let terms = study_selection_terms::Entity::find()
            .filter(study_selection_terms::Column::StudySelectionId.eq(row.id))
            .all(db)
            .await?
            .len();
        links.push((versions, terms));
    }
    Ok(links)
}

#[tokio::test]
async fn test_first_selection_is_created_at_order_one() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();

    let uids = add_arms(&db, &repo, &study_uid, &["Placebo"]).await?;

    let aggregate = repo.find_by_study(&db, &study_uid, false).await?;
    assert_eq!(aggregate.len(), 1);
    let (vo, order) = aggregate.get_specific_selection(&uids[0])?;
    assert_eq!(order, 1);
    assert_eq!(vo.fields.name, "Placebo");
    assert_eq!(vo.user_initials, AUTHOR);
    assert!(!aggregate.has_closure_data());

    let history = repo.find_selection_history(&db, &study_uid, None).await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ActionType::Create);
    assert_eq!(history[0].order, 1);
    assert!(history[0].end_date.is_none());

    assert_eq!(current_rows(&db, &study_uid, ARM).await?, vec![(uids[0].clone(), 1)]);
    Ok(())
}

#[tokio::test]
async fn test_removing_head_shifts_and_audits() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha", "Beta"]).await?;
    let (a, b) = (&uids[0], &uids[1]);

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(a)?;
    repo.save(&txn, &mut aggregate, "CD").await?;
    txn.commit().await?;

    assert_eq!(current_rows(&db, &study_uid, ARM).await?, vec![(b.clone(), 1)]);

    let history = repo.find_selection_history(&db, &study_uid, None).await?;
    let trail: Vec<(&str, ActionType, i32)> = history
        .iter()
        .map(|h| (h.study_selection_uid.as_str(), h.change_type, h.order))
        .collect();
    assert_eq!(
        trail,
        vec![
            (a.as_str(), ActionType::Delete, 1),
            (a.as_str(), ActionType::Create, 1),
            (b.as_str(), ActionType::Edit, 1),
            (b.as_str(), ActionType::Create, 2),
        ]
    );

    // Superseded states are closed, current and deleted ones are not
    let end_dates: Vec<bool> = history.iter().map(|h| h.end_date.is_some()).collect();
    assert_eq!(end_dates, vec![false, true, false, true]);
    assert_eq!(history[0].user_initials, "CD");
    assert_eq!(history[1].user_initials, AUTHOR);
    Ok(())
}

#[tokio::test]
async fn test_locked_study_rejects_save_without_writes() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    add_arms(&db, &repo, &study_uid, &["Alpha"]).await?;
    StudyRepository::new()
        .lock_study(&db, &study_uid, AUTHOR, "Protocol v1")
        .await?;
    let before = row_counts(&db).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        "StudyArm_000099",
        arm("Late"),
        AUTHOR,
    ))?;
    let err = repo.save(&txn, &mut aggregate, AUTHOR).await.unwrap_err();
    drop(txn);

    assert!(matches!(
        err,
        SelectionError::Versioning(VersioningError::StudyLocked(ref uid)) if uid == &study_uid
    ));
    assert_eq!(err.error_code(), "STUDY_LOCKED");
    assert_eq!(row_counts(&db).await?, before);
    Ok(())
}

#[tokio::test]
async fn test_rebuilt_identical_list_is_no_op() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha", "Beta"]).await?;
    let before = row_counts(&db).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    for uid in &uids {
        let (vo, _) = aggregate.get_specific_selection(uid)?;
        let rebuilt = SelectionVo::new(&study_uid, uid.clone(), vo.fields.clone(), "ZZ");
        aggregate.update_selection(rebuilt)?;
    }
    repo.save(&txn, &mut aggregate, "ZZ").await?;
    txn.commit().await?;

    assert_eq!(row_counts(&db).await?, before);
    Ok(())
}

#[tokio::test]
async fn test_swap_writes_two_edits() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha", "Beta"]).await?;
    let (a, b) = (&uids[0], &uids[1]);
    let before = row_counts(&db).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.set_new_order_for_selection(b, 1)?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    let rows = current_rows(&db, &study_uid, ARM).await?;
    assert_eq!(rows, vec![(b.clone(), 1), (a.clone(), 2)]);

    let after = row_counts(&db).await?;
    assert_eq!(after.actions, before.actions + 2);
    assert_eq!(after.selections, before.selections + 2);
    assert_eq!(after.memberships, before.memberships);

    let history = repo.find_selection_history(&db, &study_uid, Some(a)).await?;
    let trail: Vec<(ActionType, i32)> = history.iter().map(|h| (h.change_type, h.order)).collect();
    assert_eq!(trail, vec![(ActionType::Edit, 2), (ActionType::Create, 1)]);
    Ok(())
}

#[tokio::test]
async fn test_field_edit_keeps_position() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha", "Beta"]).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let (current, _) = aggregate.get_specific_selection(&uids[1])?;
    let renamed = current.with_fields(
        StudyArmFields {
            description: Some("Active comparator".to_string()),
            ..current.fields.clone()
        },
        "CD",
    );
    aggregate.update_selection(renamed)?;
    repo.save(&txn, &mut aggregate, "CD").await?;
    txn.commit().await?;

    let aggregate = repo.find_by_study(&db, &study_uid, false).await?;
    let (vo, order) = aggregate.get_specific_selection(&uids[1])?;
    assert_eq!(order, 2);
    assert_eq!(vo.fields.description.as_deref(), Some("Active comparator"));
    assert_eq!(vo.user_initials, "CD");

    let history = repo
        .find_selection_history(&db, &study_uid, Some(&uids[1]))
        .await?;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].change_type, ActionType::Edit);
    assert_eq!(history[1].fields.description, None);
    assert_eq!(history[1].end_date, Some(history[0].start_date));
    Ok(())
}

#[tokio::test]
async fn test_all_trailing_positions_are_removed() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha", "Beta", "Gamma"]).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(&uids[1])?;
    aggregate.remove_selection(&uids[2])?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    assert_eq!(current_rows(&db, &study_uid, ARM).await?, vec![(uids[0].clone(), 1)]);
    for uid in &uids[1..] {
        let history = repo.find_selection_history(&db, &study_uid, Some(uid)).await?;
        assert_eq!(history[0].change_type, ActionType::Delete);
        assert_eq!(history.last().map(|h| h.change_type), Some(ActionType::Create));
    }
    Ok(())
}

#[tokio::test]
async fn test_orders_stay_contiguous_and_unique() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["A", "B", "C", "D"]).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(&uids[1])?;
    aggregate.set_new_order_for_selection(&uids[3], 1)?;
    let uid = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(&study_uid, uid, arm("E"), AUTHOR))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    let rows = current_rows(&db, &study_uid, ARM).await?;
    let orders: Vec<i32> = rows.iter().map(|(_, order)| *order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4]);
    let distinct: HashSet<&str> = rows.iter().map(|(uid, _)| uid.as_str()).collect();
    assert_eq!(distinct.len(), rows.len());
    assert_eq!(rows[0].0, uids[3]);
    Ok(())
}

#[tokio::test]
async fn test_references_are_linked() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    seed_library(&db).await?;
    let repo = StudyObjectiveRepository::new();

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let uid = repo.generate_uid(&txn).await?;
    assert_eq!(uid, "StudyObjective_000001");
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        uid,
        objective("Objective_000001"),
        AUTHOR,
    ))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    let concepts = study_selection_concepts::Entity::find()
        .find_also_related(concept_values::Entity)
        .all(&db)
        .await?;
    assert_eq!(concepts.len(), 1);
    assert_eq!(concepts[0].0.relationship, "HAS_SELECTED_OBJECTIVE");
    assert_eq!(concepts[0].1.as_ref().map(|v| v.version.as_str()), Some("1.0"));

    let terms = study_selection_terms::Entity::find()
        .filter(study_selection_terms::Column::Relationship.eq("HAS_OBJECTIVE_LEVEL"))
        .all(&db)
        .await?;
    assert_eq!(terms.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_shifted_selection_keeps_linked_concept_version() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    seed_library(&db).await?;
    let repo = StudyObjectiveRepository::new();

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let efficacy = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        efficacy.clone(),
        objective("Objective_000002"),
        AUTHOR,
    ))?;
    let safety = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        safety.clone(),
        objective("Objective_000001"),
        AUTHOR,
    ))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    LibraryRepository::new()
        .add_concept_version(&db, "Objective", "Objective_000001", "2.0", "Final")
        .await?;

    // Removing the head moves the safety objective to order 1
    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(&efficacy)?;
    let uid = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        uid.clone(),
        objective("Objective_000001"),
        AUTHOR,
    ))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    let one_at = |version: &str| (vec![version.to_string()], 1usize);
    assert_eq!(stored_links(&db, &safety).await?, vec![one_at("1.0"), one_at("1.0")]);
    // The Delete state keeps the links of the state it closes
    assert_eq!(stored_links(&db, &efficacy).await?, vec![one_at("1.0"), one_at("1.0")]);
    // Only a fresh selection picks up the newer final version
    assert_eq!(stored_links(&db, &uid).await?, vec![one_at("2.0")]);
    Ok(())
}

#[tokio::test]
async fn test_changed_reference_is_resolved_again() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    seed_library(&db).await?;
    let repo = StudyObjectiveRepository::new();

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let uid = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        uid.clone(),
        objective("Objective_000001"),
        AUTHOR,
    ))?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let (current, _) = aggregate.get_specific_selection(&uid)?;
    let relinked = current.with_fields(objective("Objective_000002"), "CD");
    aggregate.update_selection(relinked)?;
    repo.save(&txn, &mut aggregate, "CD").await?;
    txn.commit().await?;

    let concepts = study_selection_concepts::Entity::find()
        .find_also_related(concept_values::Entity)
        .order_by_asc(study_selection_concepts::Column::Id)
        .all(&db)
        .await?;
    let names: Vec<Option<String>> = concepts.into_iter().map(|(_, v)| v.map(|v| v.name)).collect();
    assert_eq!(
        names,
        vec![
            Some("Assess safety".to_string()),
            Some("Assess efficacy".to_string())
        ]
    );
    Ok(())
}

#[tokio::test]
async fn test_deleted_uid_cannot_be_added_again() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha"]).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(&uids[0])?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;
    let before = row_counts(&db).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        uids[0].clone(),
        arm("Alpha again"),
        AUTHOR,
    ))?;
    let err = repo.save(&txn, &mut aggregate, AUTHOR).await.unwrap_err();
    txn.rollback().await?;

    assert!(matches!(err, SelectionError::SelectionUidReused(ref uid) if uid == &uids[0]));
    assert_eq!(err.error_code(), "CONFLICT");
    assert_eq!(row_counts(&db).await?, before);

    let history = repo
        .find_selection_history(&db, &study_uid, Some(&uids[0]))
        .await?;
    let changes: Vec<ActionType> = history.iter().map(|h| h.change_type).collect();
    assert_eq!(changes, vec![ActionType::Delete, ActionType::Create]);
    Ok(())
}

#[tokio::test]
async fn test_write_lock_blocks_second_writer() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let (db, study_uid) = setup_file_study(&dir.path().join("studies.db")).await?;
    let repo = StudyArmRepository::new();

    let first = db.begin().await?;
    let mut aggregate = repo.find_by_study(&first, &study_uid, true).await?;

    let second = {
        let db = db.clone();
        let study_uid = study_uid.clone();
        tokio::spawn(async move {
            let repo = StudyArmRepository::new();
            let txn = db.begin().await?;
            let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
            let seen = aggregate.len();
            let uid = repo.generate_uid(&txn).await?;
            aggregate.add_selection(SelectionVo::new(&study_uid, uid, arm("Beta"), "CD"))?;
            repo.save(&txn, &mut aggregate, "CD").await?;
            txn.commit().await?;
            anyhow::Ok(seen)
        })
    };

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!second.is_finished());

    let uid = repo.generate_uid(&first).await?;
    aggregate.add_selection(SelectionVo::new(&study_uid, uid, arm("Alpha"), AUTHOR))?;
    repo.save(&first, &mut aggregate, AUTHOR).await?;
    first.commit().await?;

    // The second writer read its closure data after the first commit
    assert_eq!(second.await??, 1);

    let aggregate = repo.find_by_study(&db, &study_uid, false).await?;
    let names: Vec<&str> = aggregate
        .selections()
        .iter()
        .map(|vo| vo.fields.name.as_str())
        .collect();
    assert_eq!(names, vec!["Alpha", "Beta"]);
    Ok(())
}

#[tokio::test]
async fn test_unresolvable_reference_aborts_save() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    seed_library(&db).await?;
    let repo = StudyObjectiveRepository::new();
    let before = row_counts(&db).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    let uid = repo.generate_uid(&txn).await?;
    aggregate.add_selection(SelectionVo::new(
        &study_uid,
        uid,
        objective("Objective_000404"),
        AUTHOR,
    ))?;
    let err = repo.save(&txn, &mut aggregate, AUTHOR).await.unwrap_err();
    txn.rollback().await?;

    assert!(matches!(err, SelectionError::ConceptNotFound { ref uid, .. } if uid == "Objective_000404"));
    assert!(err.is_not_found());
    assert_eq!(row_counts(&db).await?, before);
    assert!(repo.find_by_study(&db, &study_uid, false).await?.is_empty());

    // The counter bump was rolled back with the rest
    assert_eq!(repo.generate_uid(&db).await?, "StudyObjective_000001");
    Ok(())
}

#[tokio::test]
#[should_panic(expected = "requires find_by_study")]
async fn test_save_without_closure_data_panics_in_debug() {
    let (db, study_uid) = setup_study().await.unwrap();
    let repo = StudyArmRepository::new();

    let mut aggregate = repo.find_by_study(&db, &study_uid, false).await.unwrap();
    aggregate
        .add_selection(SelectionVo::new(&study_uid, "StudyArm_000001", arm("Alpha"), AUTHOR))
        .unwrap();
    let _ = repo.save(&db, &mut aggregate, AUTHOR).await;
}

#[tokio::test]
async fn test_unknown_study() -> Result<()> {
    let (db, _) = setup_study().await?;
    let repo = StudyArmRepository::new();

    let err = repo.find_by_study(&db, "Study_999999", false).await.unwrap_err();
    assert!(matches!(err, SelectionError::StudyNotFound(_)));

    let err = repo
        .find_by_study(&db, "Study_999999", true)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let err = repo
        .find_selection_history(&db, "Study_999999", None)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_write_lock_touches_study_root() -> Result<()> {
    let (db, study_uid) = setup_study().await?;

    assert_eq!(acquire_write_lock(&db, "Study_999999").await?, 0);
    assert_eq!(acquire_write_lock(&db, &study_uid).await?, 1);
    assert_eq!(acquire_write_lock(&db, &study_uid).await?, 1);

    let root = study_roots::Entity::find()
        .filter(study_roots::Column::Uid.eq(study_uid.as_str()))
        .one(&db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("study root missing"))?;
    assert_eq!(root.write_lock_generation, 2);
    assert!(root.write_lock.is_none());
    Ok(())
}

#[tokio::test]
async fn test_find_all_groups_by_study_and_filters_by_project() -> Result<()> {
    let (db, first_study) = setup_study().await?;
    let studies = StudyRepository::new();
    studies.create_project(&db, "P-002", "Oncology").await?;
    let second_study = studies
        .create_study(&db, "P-002", Some("2001"), None, AUTHOR)
        .await?
        .uid;
    // No arms, so never listed
    studies
        .create_study(&db, common::PROJECT_NUMBER, Some("1002"), None, AUTHOR)
        .await?;

    let repo = StudyArmRepository::new();
    add_arms(&db, &repo, &first_study, &["Alpha", "Beta"]).await?;
    add_arms(&db, &repo, &second_study, &["Gamma"]).await?;

    let all = repo.find_all(&db, &SelectionFilter::default()).await?;
    let summary: Vec<(&str, usize)> = all.iter().map(|a| (a.study_uid(), a.len())).collect();
    assert_eq!(
        summary,
        vec![(first_study.as_str(), 2), (second_study.as_str(), 1)]
    );
    assert!(all[0].selections()[0].fields.name == "Alpha");

    let oncology = repo
        .find_all(
            &db,
            &SelectionFilter {
                project_number: Some("P-002".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(oncology.len(), 1);
    assert_eq!(oncology[0].study_uid(), second_study);

    let cardiology = repo
        .find_all(
            &db,
            &SelectionFilter {
                project_name: Some("Cardiology".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(cardiology.len(), 1);
    assert_eq!(cardiology[0].study_uid(), first_study);

    let nothing = repo
        .find_all(
            &db,
            &SelectionFilter {
                project_name: Some("Neurology".to_string()),
                ..Default::default()
            },
        )
        .await?;
    assert!(nothing.is_empty());

    let objectives = StudyObjectiveRepository::new()
        .find_all(&db, &SelectionFilter::default())
        .await?;
    assert!(objectives.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_uids_are_sequential_per_kind() -> Result<()> {
    let (db, _) = setup_study().await?;
    let arms = StudyArmRepository::new();
    let objectives = StudyObjectiveRepository::new();

    assert_eq!(arms.generate_uid(&db).await?, "StudyArm_000001");
    assert_eq!(arms.generate_uid(&db).await?, "StudyArm_000002");
    assert_eq!(objectives.generate_uid(&db).await?, "StudyObjective_000001");
    assert_eq!(arms.generate_uid(&db).await?, "StudyArm_000003");
    Ok(())
}

#[tokio::test]
async fn test_selection_exists_after_delete() -> Result<()> {
    let (db, study_uid) = setup_study().await?;
    let repo = StudyArmRepository::new();
    let uids = add_arms(&db, &repo, &study_uid, &["Alpha"]).await?;

    let txn = db.begin().await?;
    let mut aggregate = repo.find_by_study(&txn, &study_uid, true).await?;
    aggregate.remove_selection(&uids[0])?;
    repo.save(&txn, &mut aggregate, AUTHOR).await?;
    txn.commit().await?;

    assert!(repo.find_by_study(&db, &study_uid, false).await?.is_empty());
    assert!(repo.selection_exists(&db, &uids[0]).await?);
    assert!(!repo.selection_exists(&db, "StudyArm_000404").await?);
    assert!(!StudyObjectiveRepository::new()
        .selection_exists(&db, &uids[0])
        .await?);
    Ok(())
}
