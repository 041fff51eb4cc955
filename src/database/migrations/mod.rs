pub use sea_orm_migration::prelude::*;

mod m20260105_000001_create_study_tables;
mod m20260105_000002_create_library_tables;
mod m20260107_000003_create_study_selections;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260105_000001_create_study_tables::Migration),
            Box::new(m20260105_000002_create_library_tables::Migration),
            Box::new(m20260107_000003_create_study_selections::Migration),
        ]
    }
}
