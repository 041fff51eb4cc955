//! Study definition errors (roots, values, lifecycle)

use thiserror::Error;

use super::versioning::VersioningError;

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("Study {0} not found")]
    NotFound(String),

    #[error("Project {0} not found")]
    ProjectNotFound(String),

    #[error(transparent)]
    Versioning(#[from] VersioningError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl StudyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StudyError::NotFound(_) | StudyError::ProjectNotFound(_))
    }

    pub fn is_client_error(&self) -> bool {
        self.is_not_found() || matches!(self, StudyError::Versioning(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            StudyError::NotFound(_) | StudyError::ProjectNotFound(_) => "NOT_FOUND",
            StudyError::Versioning(err) => err.error_code(),
            StudyError::Database(_) => "DATABASE_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_not_found() {
        let err = StudyError::ProjectNotFound("P-404".to_string());
        assert_eq!(err.to_string(), "Project P-404 not found");
        assert!(err.is_not_found());
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_already_locked() {
        let err: StudyError = VersioningError::AlreadyLocked("Study_000002".to_string()).into();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Study Study_000002 is already locked");
    }
}
