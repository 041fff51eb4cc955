//! Database error categorization and message formatting
//!
//! Repositories hand `DbErr` values upward unchanged. This module lets the
//! service layer and the CLI decide what such an error means, most importantly
//! whether the surrounding transaction may simply be retried.
//!
//! # Examples
//!
//! ```rust
//! use studybuilder::common::db_errors::*;
//! use sea_orm::DbErr;
//!
//! let err = DbErr::Exec(sea_orm::RuntimeErr::Internal("database is locked".to_string()));
//! let (kind, message) = format_db_error("save study objectives", &err);
//!
//! assert_eq!(kind, DbErrorKind::Busy);
//! assert!(kind.is_retryable());
//! assert!(message.starts_with("save study objectives"));
//! ```

use sea_orm::DbErr;

/// Categories of database errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbErrorKind {
    /// Record not found (query returned no results)
    NotFound,

    /// Unique constraint violation
    UniqueViolation,

    /// Foreign key constraint violation
    ForeignKeyViolation,

    /// Database connection error
    ConnectionError,

    /// Query or lock acquisition timeout
    Timeout,

    /// Another transaction holds the write lock (SQLite `SQLITE_BUSY` / `SQLITE_LOCKED`)
    Busy,

    /// Transaction deadlock
    Deadlock,

    /// Unknown/other database error
    Unknown,
}

impl DbErrorKind {
    /// Categorize a sea_orm database error
    ///
    /// ```
    /// use studybuilder::common::db_errors::DbErrorKind;
    /// use sea_orm::DbErr;
    ///
    /// let err = DbErr::RecordNotFound("study_roots".to_string());
    /// assert_eq!(DbErrorKind::from_db_err(&err), DbErrorKind::NotFound);
    /// ```
    pub fn from_db_err(err: &DbErr) -> Self {
        match err {
            DbErr::RecordNotFound(_) => Self::NotFound,
            DbErr::ConnectionAcquire(_) => Self::Timeout,
            DbErr::Conn(_) => {
                let msg = err.to_string().to_lowercase();
                if msg.contains("timeout") || msg.contains("timed out") {
                    Self::Timeout
                } else {
                    Self::ConnectionError
                }
            }
            DbErr::Exec(_) | DbErr::Query(_) | DbErr::Custom(_) => {
                Self::from_message(&err.to_string())
            }
            _ => Self::Unknown,
        }
    }

    fn from_message(msg: &str) -> Self {
        let msg_lower = msg.to_lowercase();
        if msg_lower.contains("unique") || msg_lower.contains("duplicate") {
            Self::UniqueViolation
        } else if msg_lower.contains("foreign key") || msg_lower.contains("fk_") {
            Self::ForeignKeyViolation
        } else if msg_lower.contains("database is locked")
            || msg_lower.contains("database table is locked")
            || msg_lower.contains("busy")
        {
            Self::Busy
        } else if msg_lower.contains("deadlock") {
            Self::Deadlock
        } else if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
            Self::Timeout
        } else {
            Self::Unknown
        }
    }

    /// Check if this error is retryable
    ///
    /// Returns `true` for transient errors where re-running the whole
    /// transaction might succeed. Lock contention lands here.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionError | Self::Timeout | Self::Busy | Self::Deadlock
        )
    }

    /// Check if this is a client error
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::UniqueViolation | Self::ForeignKeyViolation
        )
    }

    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }
}

/// Format database error with operation context
///
/// Returns the categorized kind alongside a message prefixed with the
/// operation that failed.
pub fn format_db_error(operation: &str, err: &DbErr) -> (DbErrorKind, String) {
    let kind = DbErrorKind::from_db_err(err);

    let message = match kind {
        DbErrorKind::NotFound => format!("{}: record not found", operation),
        DbErrorKind::UniqueViolation => format!("{}: duplicate key violation", operation),
        DbErrorKind::ForeignKeyViolation => {
            format!("{}: foreign key constraint violation", operation)
        }
        DbErrorKind::ConnectionError => format!("{}: database connection failed", operation),
        DbErrorKind::Timeout => format!("{}: timed out waiting for the database", operation),
        DbErrorKind::Busy => format!("{}: study is being written by another transaction", operation),
        DbErrorKind::Deadlock => format!("{}: transaction deadlock", operation),
        DbErrorKind::Unknown => format!("{}: database error - {}", operation, err),
    };

    (kind, message)
}
