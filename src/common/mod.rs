//! Cross-cutting helpers shared by the repositories and the CLI.

pub mod db_errors;

pub use db_errors::{format_db_error, DbErrorKind};
