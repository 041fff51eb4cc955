use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter};
use tracing::{debug, warn};

use crate::database::entities::study_roots;

/// Take the per-study write lock inside the caller's transaction
///
/// Clears the `write_lock` marker and bumps `write_lock_generation` on the
/// study root. The row write holds the store's write lock until the caller
/// commits or rolls back, so a second transaction doing the same waits here.
///
/// Returns the number of rows touched. An unknown study touches none and the
/// call is a no-op.
pub async fn acquire_write_lock<C>(conn: &C, study_uid: &str) -> Result<u64, DbErr>
where
    C: ConnectionTrait,
{
    let result = study_roots::Entity::update_many()
        .col_expr(
            study_roots::Column::WriteLock,
            Expr::value(Option::<String>::None),
        )
        .col_expr(
            study_roots::Column::WriteLockGeneration,
            Expr::col(study_roots::Column::WriteLockGeneration).add(1),
        )
        .filter(study_roots::Column::Uid.eq(study_uid))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        warn!("Write lock for study {} touched no rows", study_uid);
    } else {
        debug!("Acquired write lock for study {}", study_uid);
    }

    Ok(result.rows_affected)
}
