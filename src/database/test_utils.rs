use sea_orm::{DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

use super::connection::establish_connection;
use super::migrations::Migrator;

/// In-memory SQLite database with every migration applied
///
/// The pool holds a single connection, so concurrent callers queue on it the
/// same way they would queue on the study write lock of a file database.
pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = establish_connection("sqlite::memory:", 1).await?;
    Migrator::up(&db, None).await?;
    Ok(db)
}
