use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::{info, warn};

use crate::common::format_db_error;
use crate::domain::{SelectionFields, SelectionVo, StudySelectionAR};
use crate::errors::{SelectionError, SelectionResult};
use crate::repositories::{SelectionFilter, SelectionHistoryEntry, StudySelectionRepository};

/// Transactional entry point for one selection kind
///
/// Every mutation runs lock, read, mutate and save in a single transaction.
/// Any error drops the transaction, which rolls it back.
pub struct StudySelectionService<F> {
    db: DatabaseConnection,
    repository: StudySelectionRepository<F>,
}

impl<F: SelectionFields> Clone for StudySelectionService<F> {
    fn clone(&self) -> Self {
        Self::new(self.db.clone())
    }
}

impl<F: SelectionFields> StudySelectionService<F> {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            repository: StudySelectionRepository::new(),
        }
    }

    async fn mutate<T>(
        &self,
        study_uid: &str,
        author: &str,
        change: impl FnOnce(&mut StudySelectionAR<F>) -> SelectionResult<T>,
    ) -> Result<T> {
        let txn = self.db.begin().await?;
        let mut aggregate = self
            .repository
            .find_by_study(&txn, study_uid, true)
            .await
            .map_err(|err| report_contention(study_uid, "lock", err))
            .with_context(|| format!("Failed to load {} list of study {}", F::KIND, study_uid))?;

        let outcome = change(&mut aggregate)?;

        self.repository
            .save(&txn, &mut aggregate, author)
            .await
            .map_err(|err| report_contention(study_uid, "save", err))
            .with_context(|| format!("Failed to save {} list of study {}", F::KIND, study_uid))?;
        txn.commit().await?;
        Ok(outcome)
    }

    /// Append a new selection under a freshly generated uid
    pub async fn add_selection(
        &self,
        study_uid: &str,
        fields: F,
        author: &str,
    ) -> Result<SelectionVo<F>> {
        let txn = self.db.begin().await?;
        let mut aggregate = self
            .repository
            .find_by_study(&txn, study_uid, true)
            .await
            .map_err(|err| report_contention(study_uid, "lock", err))
            .with_context(|| format!("Failed to load {} list of study {}", F::KIND, study_uid))?;

        let uid = self.repository.generate_uid(&txn).await?;
        let vo = SelectionVo::new(study_uid, uid, fields, author);
        aggregate.add_selection(vo.clone())?;

        self.repository
            .save(&txn, &mut aggregate, author)
            .await
            .map_err(|err| report_contention(study_uid, "save", err))
            .with_context(|| format!("Failed to save {} list of study {}", F::KIND, study_uid))?;
        txn.commit().await?;

        info!(
            "Added {} {} to study {}",
            F::KIND,
            vo.study_selection_uid,
            study_uid
        );
        Ok(vo)
    }

    /// Replace the fields of a selection; clears its accepted flag
    pub async fn update_selection(
        &self,
        study_uid: &str,
        selection_uid: &str,
        fields: F,
        author: &str,
    ) -> Result<SelectionVo<F>> {
        self.mutate(study_uid, author, |aggregate| {
            let (current, _) = aggregate.get_specific_selection(selection_uid)?;
            let updated = current.with_fields(fields, author);
            aggregate.update_selection(updated.clone())?;
            Ok(updated)
        })
        .await
    }

    pub async fn remove_selection(
        &self,
        study_uid: &str,
        selection_uid: &str,
        author: &str,
    ) -> Result<()> {
        self.mutate(study_uid, author, |aggregate| {
            aggregate.remove_selection(selection_uid)
        })
        .await
    }

    /// Move a selection and return the order it ended up at
    pub async fn set_new_order(
        &self,
        study_uid: &str,
        selection_uid: &str,
        new_order: i32,
        author: &str,
    ) -> Result<usize> {
        self.mutate(study_uid, author, |aggregate| {
            aggregate.set_new_order_for_selection(selection_uid, new_order)?;
            let (_, order) = aggregate.get_specific_selection(selection_uid)?;
            Ok(order)
        })
        .await
    }

    pub async fn accept_version(
        &self,
        study_uid: &str,
        selection_uid: &str,
        author: &str,
    ) -> Result<SelectionVo<F>> {
        self.mutate(study_uid, author, |aggregate| {
            aggregate.accept_version(selection_uid, author)?;
            let (vo, _) = aggregate.get_specific_selection(selection_uid)?;
            Ok(vo.clone())
        })
        .await
    }

    pub async fn get_selections(&self, study_uid: &str) -> Result<Vec<SelectionVo<F>>> {
        let aggregate = self
            .repository
            .find_by_study(&self.db, study_uid, false)
            .await
            .with_context(|| format!("Failed to read {} list of study {}", F::KIND, study_uid))?;
        Ok(aggregate.selections().to_vec())
    }

    pub async fn get_selections_for_version(
        &self,
        study_uid: &str,
        version: &str,
    ) -> Result<Vec<SelectionVo<F>>> {
        let aggregate = self
            .repository
            .find_by_study_version(&self.db, study_uid, version)
            .await
            .with_context(|| {
                format!(
                    "Failed to read {} list of study {} version {}",
                    F::KIND,
                    study_uid,
                    version
                )
            })?;
        Ok(aggregate.selections().to_vec())
    }

    pub async fn get_all(&self, filter: &SelectionFilter) -> Result<Vec<StudySelectionAR<F>>> {
        Ok(self.repository.find_all(&self.db, filter).await?)
    }

    pub async fn get_history(
        &self,
        study_uid: &str,
        selection_uid: Option<&str>,
    ) -> Result<Vec<SelectionHistoryEntry<F>>> {
        let history = self
            .repository
            .find_selection_history(&self.db, study_uid, selection_uid)
            .await
            .with_context(|| format!("Failed to read {} history of study {}", F::KIND, study_uid))?;
        Ok(history)
    }
}

/// Log a lock timeout or busy database so callers know a retry may succeed
fn report_contention(study_uid: &str, step: &str, err: SelectionError) -> SelectionError {
    if let Some(message) = contention_message(study_uid, step, &err) {
        warn!("{} (retryable)", message);
    }
    err
}

fn contention_message(study_uid: &str, step: &str, err: &SelectionError) -> Option<String> {
    match err {
        SelectionError::Database(db_err) if err.is_retryable() => {
            let operation = format!("{} study {}", step, study_uid);
            Some(format_db_error(&operation, db_err).1)
        }
        _ => None,
    }
}
