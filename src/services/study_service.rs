use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::database::entities::projects;
use crate::repositories::{StudyDefinition, StudyRepository};

/// Transactional wrapper around the study lifecycle
#[derive(Clone)]
pub struct StudyService {
    db: DatabaseConnection,
    repository: StudyRepository,
}

impl StudyService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            repository: StudyRepository::new(),
        }
    }

    pub async fn create_project(&self, project_number: &str, name: &str) -> Result<projects::Model> {
        let project = self
            .repository
            .create_project(&self.db, project_number, name)
            .await
            .with_context(|| format!("Failed to create project {}", project_number))?;
        Ok(project)
    }

    pub async fn create_study(
        &self,
        project_number: &str,
        study_number: Option<&str>,
        study_acronym: Option<&str>,
        author: &str,
    ) -> Result<StudyDefinition> {
        let txn = self.db.begin().await?;
        let study = self
            .repository
            .create_study(&txn, project_number, study_number, study_acronym, author)
            .await
            .with_context(|| format!("Failed to create study in project {}", project_number))?;
        txn.commit().await?;
        Ok(study)
    }

    pub async fn get_study(&self, uid: &str) -> Result<StudyDefinition> {
        Ok(self.repository.find_study(&self.db, uid).await?)
    }

    pub async fn lock_study(
        &self,
        uid: &str,
        author: &str,
        change_description: &str,
    ) -> Result<StudyDefinition> {
        let txn = self.db.begin().await?;
        let study = self
            .repository
            .lock_study(&txn, uid, author, change_description)
            .await
            .with_context(|| format!("Failed to lock study {}", uid))?;
        txn.commit().await?;
        Ok(study)
    }

    pub async fn unlock_study(&self, uid: &str, author: &str) -> Result<StudyDefinition> {
        let txn = self.db.begin().await?;
        let study = self
            .repository
            .unlock_study(&txn, uid, author)
            .await
            .with_context(|| format!("Failed to unlock study {}", uid))?;
        txn.commit().await?;
        Ok(study)
    }

    pub async fn release_study(
        &self,
        uid: &str,
        author: &str,
        change_description: &str,
    ) -> Result<StudyDefinition> {
        let txn = self.db.begin().await?;
        let study = self
            .repository
            .release_study(&txn, uid, author, change_description)
            .await
            .with_context(|| format!("Failed to release study {}", uid))?;
        txn.commit().await?;
        Ok(study)
    }
}
