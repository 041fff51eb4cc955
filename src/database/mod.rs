pub mod connection;
pub mod entities;
pub mod migrate;
pub mod migrations;
pub mod test_utils;

pub use connection::*;
pub use migrate::{migrate_database, MigrateDirection};
