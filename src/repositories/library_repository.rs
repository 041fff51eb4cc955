use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::debug;

use crate::database::entities::{concept_roots, concept_values, ct_term_roots};
use crate::errors::{SelectionError, SelectionResult};

pub const STATUS_FINAL: &str = "Final";
pub const STATUS_DRAFT: &str = "Draft";

/// Minimal registry of library concepts and controlled terminology
///
/// Selections only ever point at rows in here; authoring workflows for the
/// library itself live elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct LibraryRepository;

impl LibraryRepository {
    pub fn new() -> Self {
        Self
    }

    /// Create a concept with a first final version `1.0`
    pub async fn create_concept<C: ConnectionTrait>(
        &self,
        conn: &C,
        concept_type: &str,
        uid: &str,
        name: &str,
    ) -> SelectionResult<concept_values::Model> {
        let now = Utc::now();
        let root = concept_roots::ActiveModel {
            uid: Set(uid.to_string()),
            concept_type: Set(concept_type.to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        let value = concept_values::ActiveModel {
            concept_root_id: Set(root.id),
            name: Set(name.to_string()),
            version: Set("1.0".to_string()),
            status: Set(STATUS_FINAL.to_string()),
            start_date: Set(now),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        debug!("Created {} {} ({})", concept_type, uid, name);
        Ok(value)
    }

    /// Add another version, keeping the name of the most recent one
    pub async fn add_concept_version<C: ConnectionTrait>(
        &self,
        conn: &C,
        concept_type: &str,
        uid: &str,
        version: &str,
        status: &str,
    ) -> SelectionResult<concept_values::Model> {
        let root = self.find_concept_root(conn, concept_type, uid).await?;
        let latest = concept_values::Entity::find()
            .filter(concept_values::Column::ConceptRootId.eq(root.id))
            .order_by_desc(concept_values::Column::StartDate)
            .order_by_desc(concept_values::Column::Id)
            .one(conn)
            .await?;

        let value = concept_values::ActiveModel {
            concept_root_id: Set(root.id),
            name: Set(latest.map(|v| v.name).unwrap_or_else(|| uid.to_string())),
            version: Set(version.to_string()),
            status: Set(status.to_string()),
            start_date: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok(value)
    }

    pub async fn create_ct_term<C: ConnectionTrait>(
        &self,
        conn: &C,
        uid: &str,
        name: &str,
        codelist: Option<&str>,
    ) -> SelectionResult<ct_term_roots::Model> {
        let term = ct_term_roots::ActiveModel {
            uid: Set(uid.to_string()),
            name: Set(name.to_string()),
            codelist: Set(codelist.map(str::to_string)),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(conn)
        .await?;
        Ok(term)
    }

    async fn find_concept_root<C: ConnectionTrait>(
        &self,
        conn: &C,
        concept_type: &str,
        uid: &str,
    ) -> SelectionResult<concept_roots::Model> {
        concept_roots::Entity::find()
            .filter(concept_roots::Column::ConceptType.eq(concept_type))
            .filter(concept_roots::Column::Uid.eq(uid))
            .one(conn)
            .await?
            .ok_or_else(|| SelectionError::ConceptNotFound {
                concept_type: concept_type.to_string(),
                uid: uid.to_string(),
            })
    }

    /// The requested version, or the latest final one when `version` is `None`
    pub async fn resolve_concept_value<C: ConnectionTrait>(
        &self,
        conn: &C,
        concept_type: &str,
        uid: &str,
        version: Option<&str>,
    ) -> SelectionResult<concept_values::Model> {
        let root = self.find_concept_root(conn, concept_type, uid).await?;

        let mut query =
            concept_values::Entity::find().filter(concept_values::Column::ConceptRootId.eq(root.id));
        query = match version {
            Some(version) => query.filter(concept_values::Column::Version.eq(version)),
            None => query.filter(concept_values::Column::Status.eq(STATUS_FINAL)),
        };

        query
            .order_by_desc(concept_values::Column::StartDate)
            .order_by_desc(concept_values::Column::Id)
            .one(conn)
            .await?
            .ok_or_else(|| SelectionError::ConceptVersionNotFound {
                concept_type: concept_type.to_string(),
                uid: uid.to_string(),
                version: version.unwrap_or("latest final").to_string(),
            })
    }

    pub async fn resolve_term<C: ConnectionTrait>(
        &self,
        conn: &C,
        term_uid: &str,
    ) -> SelectionResult<ct_term_roots::Model> {
        ct_term_roots::Entity::find()
            .filter(ct_term_roots::Column::Uid.eq(term_uid))
            .one(conn)
            .await?
            .ok_or_else(|| SelectionError::TermNotFound(term_uid.to_string()))
    }
}
