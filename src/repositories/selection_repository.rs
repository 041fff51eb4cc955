use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::sea_query::{JoinType, Query};
use serde::Serialize;
use tracing::{debug, info};

use crate::database::entities::study_value_versions::StudyStatus;
use crate::database::entities::{
    projects, study_actions, study_roots, study_selection_concepts, study_selection_terms,
    study_selections, study_value_selections, study_value_versions, study_values,
};
use crate::domain::kinds::{
    StudyActivityFields, StudyArmFields, StudyBranchArmFields, StudyCohortFields,
    StudyCompoundFields, StudyCriteriaFields, StudyElementFields, StudyEndpointFields,
    StudyObjectiveFields,
};
use crate::domain::{
    compute_diff, find_duplicate_uid, ActionType, ClosureData, SelectionFields,
    SelectionReference, SelectionVo, StudySelectionAR,
};
use crate::errors::{SelectionError, SelectionResult, VersioningError};

use super::library_repository::LibraryRepository;
use super::uid_counter::next_uid;
use super::write_lock::acquire_write_lock;

/// Restricts `find_all` to studies whose current value belongs to a project
#[derive(Debug, Clone, Default)]
pub struct SelectionFilter {
    pub project_name: Option<String>,
    pub project_number: Option<String>,
}

impl SelectionFilter {
    fn is_empty(&self) -> bool {
        self.project_name.is_none() && self.project_number.is_none()
    }
}

/// One historical state of a selection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionHistoryEntry<F> {
    pub study_uid: String,
    pub study_selection_uid: String,
    pub order: i32,
    pub accepted_version: bool,
    pub fields: F,
    pub user_initials: String,
    pub change_type: ActionType,
    pub start_date: DateTime<Utc>,
    /// Date of the action that superseded this state
    pub end_date: Option<DateTime<Utc>>,
}

/// Versioned store for one selection kind
///
/// Selection rows and audit actions are append-only. A save only inserts
/// rows and moves membership of the study's current value.
pub struct StudySelectionRepository<F> {
    library: LibraryRepository,
    _kind: PhantomData<fn() -> F>,
}

pub type StudyObjectiveRepository = StudySelectionRepository<StudyObjectiveFields>;
pub type StudyEndpointRepository = StudySelectionRepository<StudyEndpointFields>;
pub type StudyCompoundRepository = StudySelectionRepository<StudyCompoundFields>;
pub type StudyCriteriaRepository = StudySelectionRepository<StudyCriteriaFields>;
pub type StudyActivityRepository = StudySelectionRepository<StudyActivityFields>;
pub type StudyArmRepository = StudySelectionRepository<StudyArmFields>;
pub type StudyBranchArmRepository = StudySelectionRepository<StudyBranchArmFields>;
pub type StudyCohortRepository = StudySelectionRepository<StudyCohortFields>;
pub type StudyElementRepository = StudySelectionRepository<StudyElementFields>;

impl<F: SelectionFields> Default for StudySelectionRepository<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: SelectionFields> StudySelectionRepository<F> {
    pub fn new() -> Self {
        Self {
            library: LibraryRepository::new(),
            _kind: PhantomData,
        }
    }

    /// Current selections of every study, one aggregate per study with at least one
    pub async fn find_all<C: ConnectionTrait>(
        &self,
        conn: &C,
        filter: &SelectionFilter,
    ) -> SelectionResult<Vec<StudySelectionAR<F>>> {
        let roots = study_roots::Entity::find()
            .filter(study_roots::Column::LatestValueId.is_not_null())
            .order_by_asc(study_roots::Column::Uid)
            .all(conn)
            .await?;
        if roots.is_empty() {
            return Ok(Vec::new());
        }
        let study_uid_by_value: HashMap<i32, &str> = roots
            .iter()
            .filter_map(|root| root.latest_value_id.map(|id| (id, root.uid.as_str())))
            .collect();

        let mut current_values = Query::select()
            .column(study_values::Column::Id)
            .from(study_values::Entity)
            .and_where(
                study_values::Column::Id.in_subquery(
                    Query::select()
                        .column(study_roots::Column::LatestValueId)
                        .from(study_roots::Entity)
                        .and_where(study_roots::Column::LatestValueId.is_not_null())
                        .to_owned(),
                ),
            )
            .to_owned();
        if !filter.is_empty() {
            let mut projects_query = Query::select()
                .column(projects::Column::Id)
                .from(projects::Entity)
                .to_owned();
            if let Some(name) = &filter.project_name {
                projects_query.and_where(projects::Column::Name.eq(name.as_str()));
            }
            if let Some(number) = &filter.project_number {
                projects_query.and_where(projects::Column::ProjectNumber.eq(number.as_str()));
            }
            current_values.and_where(study_values::Column::ProjectId.in_subquery(projects_query));
        }

        let memberships = study_value_selections::Entity::find()
            .find_also_related(study_selections::Entity)
            .filter(study_value_selections::Column::StudyValueId.in_subquery(current_values))
            .filter(study_selections::Column::Kind.eq(F::KIND))
            .order_by_asc(study_selections::Column::Order)
            .all(conn)
            .await?;

        // Keyed in root uid order
        let mut grouped: IndexMap<&str, Vec<study_selections::Model>> = roots
            .iter()
            .map(|root| (root.uid.as_str(), Vec::new()))
            .collect();
        for (membership, selection) in memberships {
            let (Some(selection), Some(study_uid)) = (
                selection,
                study_uid_by_value.get(&membership.study_value_id),
            ) else {
                continue;
            };
            if let Some(rows) = grouped.get_mut(study_uid) {
                rows.push(selection);
            }
        }

        let mut aggregates = Vec::new();
        for (study_uid, rows) in grouped {
            if rows.is_empty() {
                continue;
            }
            let selections = self.to_vos(conn, study_uid, rows).await?;
            aggregates.push(StudySelectionAR::from_repository_values(study_uid, selections));
        }
        Ok(aggregates)
    }

    /// Current selections of one study
    ///
    /// With `for_update` the study write lock is taken first and the list read
    /// is kept on the aggregate as closure data for [`Self::save`].
    pub async fn find_by_study<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
        for_update: bool,
    ) -> SelectionResult<StudySelectionAR<F>> {
        if for_update {
            acquire_write_lock(conn, study_uid).await?;
        }
        let root = self.find_root(conn, study_uid).await?;
        let value_id = current_value_id(&root)?;
        let selections = self.load_value_selections(conn, study_uid, value_id).await?;

        if !for_update {
            return Ok(StudySelectionAR::from_repository_values(study_uid, selections));
        }
        let mut aggregate = StudySelectionAR::from_repository_values(study_uid, selections.clone());
        aggregate.set_closure_data(ClosureData {
            study_uid: study_uid.to_string(),
            selections,
        });
        Ok(aggregate)
    }

    /// Selections frozen in a LOCKED or RELEASED study version
    pub async fn find_by_study_version<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
        version: &str,
    ) -> SelectionResult<StudySelectionAR<F>> {
        let root = self.find_root(conn, study_uid).await?;
        let entry = study_value_versions::Entity::find()
            .filter(study_value_versions::Column::StudyRootId.eq(root.id))
            .filter(study_value_versions::Column::Version.eq(version))
            .filter(study_value_versions::Column::Status.is_in([
                StudyStatus::Locked.as_str(),
                StudyStatus::Released.as_str(),
            ]))
            .order_by_desc(study_value_versions::Column::Id)
            .one(conn)
            .await?
            .ok_or_else(|| SelectionError::StudyVersionNotFound {
                study_uid: study_uid.to_string(),
                version: version.to_string(),
            })?;

        let selections = self
            .load_value_selections(conn, study_uid, entry.study_value_id)
            .await?;
        Ok(StudySelectionAR::from_repository_values(study_uid, selections))
    }

    /// Persist the aggregate's list against the closure data read under the lock
    ///
    /// Must follow `find_by_study(.., true)` on the same transaction. Errors
    /// leave partial writes on `conn`; the caller drops the transaction.
    pub async fn save<C: ConnectionTrait>(
        &self,
        conn: &C,
        aggregate: &mut StudySelectionAR<F>,
        author: &str,
    ) -> SelectionResult<()> {
        let closure = aggregate.take_closure_data();
        debug_assert!(
            closure.is_some(),
            "save() for study {} requires find_by_study(.., for_update = true) first",
            aggregate.study_uid()
        );
        let closure = closure
            .ok_or_else(|| SelectionError::MissingClosureData(aggregate.study_uid().to_string()))?;
        if closure.study_uid != aggregate.study_uid() {
            return Err(SelectionError::ClosureMismatch {
                expected: aggregate.study_uid().to_string(),
                found: closure.study_uid,
            });
        }

        let study_uid = aggregate.study_uid();
        let root = self.find_root(conn, study_uid).await?;
        if root.is_locked() {
            return Err(VersioningError::StudyLocked(study_uid.to_string()).into());
        }
        let value_id = current_value_id(&root)?;

        if let Some(uid) = find_duplicate_uid(aggregate.selections()) {
            return Err(SelectionError::DuplicateSelection(uid.to_string()));
        }

        let diff = compute_diff(&closure.selections, aggregate.selections());
        if diff.is_empty() {
            debug!("No {} changes for study {}", F::KIND, study_uid);
            return Ok(());
        }

        // One Create per uid: a stored uid missing from the closure data was deleted
        let previous_uids: HashSet<&str> = closure
            .selections
            .iter()
            .map(|vo| vo.study_selection_uid.as_str())
            .collect();
        for addition in &diff.additions {
            let uid = addition.vo.study_selection_uid.as_str();
            if !previous_uids.contains(uid) && self.selection_exists(conn, uid).await? {
                return Err(SelectionError::SelectionUidReused(uid.to_string()));
            }
        }

        let current_rows: HashMap<String, study_selections::Model> = self
            .value_selection_rows(conn, value_id)
            .await?
            .into_iter()
            .map(|row| (row.uid.clone(), row))
            .collect();
        let now = Utc::now();
        // uid -> (Edit action, superseded row, superseded state)
        let mut pending_edits: HashMap<&str, (i32, &study_selections::Model, &SelectionVo<F>)> =
            HashMap::new();

        for removal in &diff.removals {
            let uid = removal.vo.study_selection_uid.as_str();
            let row = current_rows
                .get(uid)
                .ok_or_else(|| SelectionError::SelectionNotFound(uid.to_string()))?;

            study_value_selections::Entity::delete_many()
                .filter(study_value_selections::Column::StudyValueId.eq(value_id))
                .filter(study_value_selections::Column::StudySelectionId.eq(row.id))
                .exec(conn)
                .await?;

            let action_id =
                insert_action(conn, root.id, removal.action, now, author, Some(row.id)).await?;

            if removal.action == ActionType::Delete {
                // Carries the Delete action; never attached to a study value
                let placeholder = study_selections::ActiveModel {
                    uid: Set(row.uid.clone()),
                    kind: Set(row.kind.clone()),
                    order: Set(row.order),
                    accepted_version: Set(row.accepted_version),
                    fields: Set(row.fields.clone()),
                    after_action_id: Set(action_id),
                    created_at: Set(now),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                copy_links(conn, row.id, placeholder.id).await?;
            } else {
                pending_edits.insert(uid, (action_id, row, removal.vo));
            }
            debug!(
                "{} {} {} (was order {})",
                removal.action, F::KIND, uid, removal.order
            );
        }

        for addition in &diff.additions {
            let vo = addition.vo;
            let uid = vo.study_selection_uid.as_str();
            let superseded = pending_edits.remove(uid);
            let action_id = match superseded {
                Some((action_id, _, _)) => action_id,
                None => {
                    insert_action(
                        conn,
                        root.id,
                        ActionType::Create,
                        vo.start_date,
                        &vo.user_initials,
                        None,
                    )
                    .await?
                }
            };

            let row = study_selections::ActiveModel {
                uid: Set(uid.to_string()),
                kind: Set(F::KIND.to_string()),
                order: Set(addition.order as i32),
                accepted_version: Set(vo.accepted_version),
                fields: Set(serde_json::to_value(&vo.fields)?),
                after_action_id: Set(action_id),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            study_value_selections::ActiveModel {
                study_value_id: Set(value_id),
                study_selection_id: Set(row.id),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            // Unchanged references keep the library versions linked when first selected
            match superseded {
                Some((_, old_row, old_vo))
                    if old_vo.fields.references() == vo.fields.references() =>
                {
                    copy_links(conn, old_row.id, row.id).await?;
                }
                _ => self.link_references(conn, row.id, &vo.fields).await?,
            }
            debug!("Wrote {} {} at order {}", F::KIND, uid, addition.order);
        }

        info!(
            "Saved {} list for study {}: {} superseded, {} written",
            F::KIND,
            study_uid,
            diff.removals.len(),
            diff.additions.len()
        );
        Ok(())
    }

    /// Next `<Kind>_NNNNNN` uid for a fresh selection
    pub async fn generate_uid<C>(&self, conn: &C) -> SelectionResult<String>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        Ok(next_uid(conn, F::KIND).await?)
    }

    /// Every state of this kind recorded in the study's audit trail
    ///
    /// Ordered by selection uid, most recent state first.
    pub async fn find_selection_history<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
        selection_uid: Option<&str>,
    ) -> SelectionResult<Vec<SelectionHistoryEntry<F>>> {
        let root = self.find_root(conn, study_uid).await?;
        let actions: HashMap<i32, study_actions::Model> = study_actions::Entity::find()
            .filter(study_actions::Column::StudyRootId.eq(root.id))
            .all(conn)
            .await?
            .into_iter()
            .map(|action| (action.id, action))
            .collect();
        if actions.is_empty() {
            return Ok(Vec::new());
        }

        let superseded_at: HashMap<i32, DateTime<Utc>> = actions
            .values()
            .filter_map(|action| action.before_selection_id.map(|id| (id, action.date)))
            .collect();

        let mut query = study_selections::Entity::find()
            .join(JoinType::InnerJoin, study_selections::Relation::StudyActions.def())
            .filter(study_actions::Column::StudyRootId.eq(root.id))
            .filter(study_selections::Column::Kind.eq(F::KIND));
        if let Some(uid) = selection_uid {
            query = query.filter(study_selections::Column::Uid.eq(uid));
        }
        let rows = query
            .order_by_asc(study_selections::Column::Uid)
            .order_by_desc(study_selections::Column::Id)
            .all(conn)
            .await?;

        rows.into_iter()
            .map(|row| -> SelectionResult<SelectionHistoryEntry<F>> {
                let action = actions
                    .get(&row.after_action_id)
                    .ok_or_else(|| missing_action(&row))?;
                Ok(SelectionHistoryEntry {
                    study_uid: study_uid.to_string(),
                    end_date: superseded_at.get(&row.id).copied(),
                    study_selection_uid: row.uid,
                    order: row.order,
                    accepted_version: row.accepted_version,
                    fields: serde_json::from_value(row.fields)?,
                    user_initials: action.user_initials.clone(),
                    change_type: ActionType::from(action.action_type.clone()),
                    start_date: action.date,
                })
            })
            .collect()
    }

    /// True if any row of this kind ever carried `selection_uid`
    pub async fn selection_exists<C: ConnectionTrait>(
        &self,
        conn: &C,
        selection_uid: &str,
    ) -> SelectionResult<bool> {
        let count = study_selections::Entity::find()
            .filter(study_selections::Column::Kind.eq(F::KIND))
            .filter(study_selections::Column::Uid.eq(selection_uid))
            .count(conn)
            .await?;
        Ok(count > 0)
    }

    async fn find_root<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
    ) -> SelectionResult<study_roots::Model> {
        study_roots::Entity::find()
            .filter(study_roots::Column::Uid.eq(study_uid))
            .one(conn)
            .await?
            .ok_or_else(|| SelectionError::StudyNotFound(study_uid.to_string()))
    }

    async fn value_selection_rows<C: ConnectionTrait>(
        &self,
        conn: &C,
        value_id: i32,
    ) -> SelectionResult<Vec<study_selections::Model>> {
        Ok(study_selections::Entity::find()
            .join(
                JoinType::InnerJoin,
                study_selections::Relation::StudyValueSelections.def(),
            )
            .filter(study_value_selections::Column::StudyValueId.eq(value_id))
            .filter(study_selections::Column::Kind.eq(F::KIND))
            .order_by_asc(study_selections::Column::Order)
            .all(conn)
            .await?)
    }

    async fn load_value_selections<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
        value_id: i32,
    ) -> SelectionResult<Vec<SelectionVo<F>>> {
        let rows = self.value_selection_rows(conn, value_id).await?;
        self.to_vos(conn, study_uid, rows).await
    }

    /// Rebuild VOs, taking start date and initials from each row's producing action
    async fn to_vos<C: ConnectionTrait>(
        &self,
        conn: &C,
        study_uid: &str,
        rows: Vec<study_selections::Model>,
    ) -> SelectionResult<Vec<SelectionVo<F>>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let actions: HashMap<i32, study_actions::Model> = study_actions::Entity::find()
            .filter(study_actions::Column::Id.is_in(rows.iter().map(|row| row.after_action_id)))
            .all(conn)
            .await?
            .into_iter()
            .map(|action| (action.id, action))
            .collect();

        rows.into_iter()
            .map(|row| -> SelectionResult<SelectionVo<F>> {
                let action = actions
                    .get(&row.after_action_id)
                    .ok_or_else(|| missing_action(&row))?;
                Ok(SelectionVo {
                    study_uid: study_uid.to_string(),
                    study_selection_uid: row.uid,
                    accepted_version: row.accepted_version,
                    start_date: action.date,
                    user_initials: action.user_initials.clone(),
                    fields: serde_json::from_value(row.fields)?,
                })
            })
            .collect()
    }

    async fn link_references<C: ConnectionTrait>(
        &self,
        conn: &C,
        selection_id: i32,
        fields: &F,
    ) -> SelectionResult<()> {
        for reference in fields.references() {
            match reference {
                SelectionReference::Concept {
                    relationship,
                    concept_type,
                    uid,
                    version,
                } => {
                    let value = self
                        .library
                        .resolve_concept_value(conn, concept_type, &uid, version.as_deref())
                        .await?;
                    study_selection_concepts::ActiveModel {
                        study_selection_id: Set(selection_id),
                        relationship: Set(relationship.to_string()),
                        concept_value_id: Set(value.id),
                        ..Default::default()
                    }
                    .insert(conn)
                    .await?;
                }
                SelectionReference::Term {
                    relationship,
                    term_uid,
                } => {
                    let term = self.library.resolve_term(conn, &term_uid).await?;
                    study_selection_terms::ActiveModel {
                        study_selection_id: Set(selection_id),
                        relationship: Set(relationship.to_string()),
                        ct_term_root_id: Set(term.id),
                        ..Default::default()
                    }
                    .insert(conn)
                    .await?;
                }
            }
        }
        Ok(())
    }
}

fn current_value_id(root: &study_roots::Model) -> SelectionResult<i32> {
    root.latest_value_id
        .ok_or_else(|| SelectionError::StudyNotFound(root.uid.clone()))
}

fn missing_action(row: &study_selections::Model) -> SelectionError {
    SelectionError::Database(sea_orm::DbErr::RecordNotFound(format!(
        "audit action {} of selection {}",
        row.after_action_id, row.uid
    )))
}

/// Point `to_selection_id` at the same library concept versions and terms as `from_selection_id`
async fn copy_links<C: ConnectionTrait>(
    conn: &C,
    from_selection_id: i32,
    to_selection_id: i32,
) -> SelectionResult<()> {
    let concepts = study_selection_concepts::Entity::find()
        .filter(study_selection_concepts::Column::StudySelectionId.eq(from_selection_id))
        .order_by_asc(study_selection_concepts::Column::Id)
        .all(conn)
        .await?;
    for link in concepts {
        study_selection_concepts::ActiveModel {
            study_selection_id: Set(to_selection_id),
            relationship: Set(link.relationship),
            concept_value_id: Set(link.concept_value_id),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }

    let terms = study_selection_terms::Entity::find()
        .filter(study_selection_terms::Column::StudySelectionId.eq(from_selection_id))
        .order_by_asc(study_selection_terms::Column::Id)
        .all(conn)
        .await?;
    for link in terms {
        study_selection_terms::ActiveModel {
            study_selection_id: Set(to_selection_id),
            relationship: Set(link.relationship),
            ct_term_root_id: Set(link.ct_term_root_id),
            ..Default::default()
        }
        .insert(conn)
        .await?;
    }
    Ok(())
}

async fn insert_action<C: ConnectionTrait>(
    conn: &C,
    study_root_id: i32,
    action: ActionType,
    date: DateTime<Utc>,
    user_initials: &str,
    before_selection_id: Option<i32>,
) -> SelectionResult<i32> {
    let action = study_actions::ActiveModel {
        study_root_id: Set(study_root_id),
        action_type: Set(action.into()),
        date: Set(date),
        user_initials: Set(user_initials.to_string()),
        before_selection_id: Set(before_selection_id),
        after_study_value_id: Set(None),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(action.id)
}
