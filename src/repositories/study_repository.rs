use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use crate::database::entities::study_value_versions::StudyStatus;
use crate::database::entities::{
    projects, study_actions, study_roots, study_value_selections, study_value_versions,
    study_values,
};
use crate::domain::ActionType;
use crate::errors::{StudyError, StudyResult, VersioningError};

use super::uid_counter::next_uid;
use super::write_lock::acquire_write_lock;

pub const STUDY_UID_LABEL: &str = "Study";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyVersionEntry {
    pub status: StudyStatus,
    pub version: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub author: String,
    pub change_description: Option<String>,
}

/// Read model of a study root and its current value
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudyDefinition {
    pub uid: String,
    pub study_number: Option<String>,
    pub study_acronym: Option<String>,
    pub project_number: Option<String>,
    pub project_name: Option<String>,
    pub status: StudyStatus,
    pub latest_locked_version: Option<String>,
    pub latest_released_version: Option<String>,
    pub versions: Vec<StudyVersionEntry>,
}

/// Study roots, their values and the DRAFT / LOCKED / RELEASED lifecycle
///
/// Lifecycle changes take the same per-study write lock as selection saves.
#[derive(Debug, Default, Clone, Copy)]
pub struct StudyRepository;

impl StudyRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_project<C: ConnectionTrait>(
        &self,
        conn: &C,
        project_number: &str,
        name: &str,
    ) -> StudyResult<projects::Model> {
        let project = projects::ActiveModel {
            project_number: Set(project_number.to_string()),
            name: Set(name.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        info!("Created project {} ({})", project.project_number, project.name);
        Ok(project)
    }

    pub async fn create_study<C>(
        &self,
        conn: &C,
        project_number: &str,
        study_number: Option<&str>,
        study_acronym: Option<&str>,
        author: &str,
    ) -> StudyResult<StudyDefinition>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let project = projects::Entity::find()
            .filter(projects::Column::ProjectNumber.eq(project_number))
            .one(conn)
            .await?
            .ok_or_else(|| StudyError::ProjectNotFound(project_number.to_string()))?;

        let uid = next_uid(conn, STUDY_UID_LABEL).await?;
        let now = Utc::now();

        let root = study_roots::ActiveModel {
            uid: Set(uid.clone()),
            write_lock: Set(None),
            write_lock_generation: Set(0),
            latest_value_id: Set(None),
            latest_locked_value_id: Set(None),
            latest_released_value_id: Set(None),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        let value = study_values::ActiveModel {
            study_root_id: Set(root.id),
            project_id: Set(Some(project.id)),
            study_number: Set(study_number.map(str::to_string)),
            study_acronym: Set(study_acronym.map(str::to_string)),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        let mut root: study_roots::ActiveModel = root.into();
        root.latest_value_id = Set(Some(value.id));
        let root = root.update(conn).await?;

        insert_version(conn, &root, value.id, StudyStatus::Draft, None, author, None, now).await?;
        insert_study_action(conn, &root, value.id, ActionType::Create, author, now).await?;

        info!("Created study {} in project {}", uid, project_number);
        self.find_study(conn, &uid).await
    }

    pub async fn find_study<C: ConnectionTrait>(
        &self,
        conn: &C,
        uid: &str,
    ) -> StudyResult<StudyDefinition> {
        let root = find_root(conn, uid).await?;
        let value = current_value(conn, &root).await?;
        let project = match value.project_id {
            Some(project_id) => projects::Entity::find_by_id(project_id).one(conn).await?,
            None => None,
        };

        let versions = study_value_versions::Entity::find()
            .filter(study_value_versions::Column::StudyRootId.eq(root.id))
            .order_by_asc(study_value_versions::Column::StartDate)
            .order_by_asc(study_value_versions::Column::Id)
            .all(conn)
            .await?;

        let latest_version_of = |status: StudyStatus| {
            versions
                .iter()
                .rev()
                .find(|v| StudyStatus::from(v.status.clone()) == status)
                .and_then(|v| v.version.clone())
        };

        Ok(StudyDefinition {
            uid: root.uid.clone(),
            study_number: value.study_number,
            study_acronym: value.study_acronym,
            project_number: project.as_ref().map(|p| p.project_number.clone()),
            project_name: project.map(|p| p.name),
            status: if root.is_locked() {
                StudyStatus::Locked
            } else {
                StudyStatus::Draft
            },
            latest_locked_version: latest_version_of(StudyStatus::Locked),
            latest_released_version: latest_version_of(StudyStatus::Released),
            versions: versions
                .into_iter()
                .map(|v| StudyVersionEntry {
                    status: StudyStatus::from(v.status),
                    version: v.version,
                    start_date: v.start_date,
                    end_date: v.end_date,
                    author: v.author,
                    change_description: v.change_description,
                })
                .collect(),
        })
    }

    pub async fn is_locked<C: ConnectionTrait>(&self, conn: &C, uid: &str) -> StudyResult<bool> {
        Ok(find_root(conn, uid).await?.is_locked())
    }

    /// Freeze the current value as the next major version
    ///
    /// Writes a LOCKED `N` and a RELEASED `N.0` entry for the current value.
    pub async fn lock_study<C: ConnectionTrait>(
        &self,
        conn: &C,
        uid: &str,
        author: &str,
        change_description: &str,
    ) -> StudyResult<StudyDefinition> {
        acquire_write_lock(conn, uid).await?;
        let root = find_root(conn, uid).await?;
        if root.is_locked() {
            return Err(VersioningError::AlreadyLocked(uid.to_string()).into());
        }
        let value = current_value(conn, &root).await?;
        let now = Utc::now();

        let major = count_versions(conn, &root, StudyStatus::Locked).await? + 1;
        close_open_versions(conn, &root, &[StudyStatus::Draft, StudyStatus::Released], now).await?;
        insert_version(
            conn,
            &root,
            value.id,
            StudyStatus::Locked,
            Some(major.to_string()),
            author,
            Some(change_description),
            now,
        )
        .await?;
        insert_version(
            conn,
            &root,
            value.id,
            StudyStatus::Released,
            Some(format!("{}.0", major)),
            author,
            Some(change_description),
            now,
        )
        .await?;

        let mut active: study_roots::ActiveModel = root.clone().into();
        active.latest_locked_value_id = Set(Some(value.id));
        active.latest_released_value_id = Set(Some(value.id));
        let root = active.update(conn).await?;

        insert_study_action(conn, &root, value.id, ActionType::Edit, author, now).await?;

        info!("Locked study {} as version {}", uid, major);
        self.find_study(conn, uid).await
    }

    /// Branch a new draft value off the locked one
    pub async fn unlock_study<C: ConnectionTrait>(
        &self,
        conn: &C,
        uid: &str,
        author: &str,
    ) -> StudyResult<StudyDefinition> {
        acquire_write_lock(conn, uid).await?;
        let root = find_root(conn, uid).await?;
        if !root.is_locked() {
            return Err(VersioningError::NotLocked(uid.to_string()).into());
        }
        let now = Utc::now();

        close_open_versions(conn, &root, &[StudyStatus::Locked], now).await?;
        branch_draft_value(conn, root, author, now).await?;

        info!("Unlocked study {}", uid);
        self.find_study(conn, uid).await
    }

    /// Publish the current draft as a minor release
    ///
    /// The released value is frozen by branching a fresh draft off it.
    pub async fn release_study<C: ConnectionTrait>(
        &self,
        conn: &C,
        uid: &str,
        author: &str,
        change_description: &str,
    ) -> StudyResult<StudyDefinition> {
        acquire_write_lock(conn, uid).await?;
        let root = find_root(conn, uid).await?;
        if root.is_locked() {
            return Err(VersioningError::StudyLocked(uid.to_string()).into());
        }
        let value = current_value(conn, &root).await?;
        let now = Utc::now();

        let major = count_versions(conn, &root, StudyStatus::Locked).await?;
        let minor = next_minor_version(conn, &root, major).await?;
        let version = format!("{}.{}", major, minor);

        close_open_versions(conn, &root, &[StudyStatus::Draft, StudyStatus::Released], now).await?;
        insert_version(
            conn,
            &root,
            value.id,
            StudyStatus::Released,
            Some(version.clone()),
            author,
            Some(change_description),
            now,
        )
        .await?;

        let mut active: study_roots::ActiveModel = root.into();
        active.latest_released_value_id = Set(Some(value.id));
        let root = active.update(conn).await?;

        branch_draft_value(conn, root, author, now).await?;

        info!("Released study {} as version {}", uid, version);
        self.find_study(conn, uid).await
    }
}

async fn find_root<C: ConnectionTrait>(
    conn: &C,
    uid: &str,
) -> StudyResult<study_roots::Model> {
    study_roots::Entity::find()
        .filter(study_roots::Column::Uid.eq(uid))
        .one(conn)
        .await?
        .ok_or_else(|| StudyError::NotFound(uid.to_string()))
}

async fn current_value<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
) -> StudyResult<study_values::Model> {
    let value_id = root
        .latest_value_id
        .ok_or_else(|| StudyError::NotFound(root.uid.clone()))?;
    study_values::Entity::find_by_id(value_id)
        .one(conn)
        .await?
        .ok_or_else(|| StudyError::NotFound(root.uid.clone()))
}

/// Copy the current value and its selection membership, move `LATEST` onto the
/// copy and open a DRAFT version for it
async fn branch_draft_value<C: ConnectionTrait>(
    conn: &C,
    root: study_roots::Model,
    author: &str,
    now: DateTime<Utc>,
) -> StudyResult<study_roots::Model> {
    let previous = current_value(conn, &root).await?;

    let value = study_values::ActiveModel {
        study_root_id: Set(root.id),
        project_id: Set(previous.project_id),
        study_number: Set(previous.study_number.clone()),
        study_acronym: Set(previous.study_acronym.clone()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    let memberships = study_value_selections::Entity::find()
        .filter(study_value_selections::Column::StudyValueId.eq(previous.id))
        .all(conn)
        .await?;
    if !memberships.is_empty() {
        study_value_selections::Entity::insert_many(memberships.into_iter().map(|m| {
            study_value_selections::ActiveModel {
                study_value_id: Set(value.id),
                study_selection_id: Set(m.study_selection_id),
                ..Default::default()
            }
        }))
        .exec_without_returning(conn)
        .await?;
    }

    let mut active: study_roots::ActiveModel = root.into();
    active.latest_value_id = Set(Some(value.id));
    let root = active.update(conn).await?;

    insert_version(conn, &root, value.id, StudyStatus::Draft, None, author, None, now).await?;
    insert_study_action(conn, &root, value.id, ActionType::Edit, author, now).await?;
    Ok(root)
}

async fn count_versions<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
    status: StudyStatus,
) -> StudyResult<u64> {
    Ok(study_value_versions::Entity::find()
        .filter(study_value_versions::Column::StudyRootId.eq(root.id))
        .filter(study_value_versions::Column::Status.eq(status.as_str()))
        .count(conn)
        .await?)
}

async fn next_minor_version<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
    major: u64,
) -> StudyResult<u64> {
    let prefix = format!("{}.", major);
    let released = study_value_versions::Entity::find()
        .filter(study_value_versions::Column::StudyRootId.eq(root.id))
        .filter(study_value_versions::Column::Status.eq(StudyStatus::Released.as_str()))
        .filter(study_value_versions::Column::Version.starts_with(&prefix))
        .all(conn)
        .await?;

    let highest = released
        .iter()
        .filter_map(|v| v.version.as_deref())
        .filter_map(|v| v.strip_prefix(&prefix))
        .filter_map(|minor| minor.parse::<u64>().ok())
        .max();
    Ok(highest.map_or(1, |minor| minor + 1))
}

async fn close_open_versions<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
    statuses: &[StudyStatus],
    now: DateTime<Utc>,
) -> StudyResult<()> {
    study_value_versions::Entity::update_many()
        .col_expr(study_value_versions::Column::EndDate, Expr::value(now))
        .filter(study_value_versions::Column::StudyRootId.eq(root.id))
        .filter(study_value_versions::Column::EndDate.is_null())
        .filter(
            study_value_versions::Column::Status
                .is_in(statuses.iter().map(|status| status.as_str())),
        )
        .exec(conn)
        .await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn insert_version<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
    value_id: i32,
    status: StudyStatus,
    version: Option<String>,
    author: &str,
    change_description: Option<&str>,
    now: DateTime<Utc>,
) -> StudyResult<()> {
    study_value_versions::ActiveModel {
        study_root_id: Set(root.id),
        study_value_id: Set(value_id),
        status: Set(status.into()),
        version: Set(version),
        start_date: Set(now),
        end_date: Set(None),
        author: Set(author.to_string()),
        change_description: Set(change_description.map(str::to_string)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}

async fn insert_study_action<C: ConnectionTrait>(
    conn: &C,
    root: &study_roots::Model,
    value_id: i32,
    action: ActionType,
    author: &str,
    now: DateTime<Utc>,
) -> StudyResult<()> {
    study_actions::ActiveModel {
        study_root_id: Set(root.id),
        action_type: Set(action.into()),
        date: Set(now),
        user_initials: Set(author.to_string()),
        before_selection_id: Set(None),
        after_study_value_id: Set(Some(value_id)),
        ..Default::default()
    }
    .insert(conn)
    .await?;
    Ok(())
}
