//! Patient record repository - a patient's treatment history entries.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::patient_record::{self, Entity as PatientRecordEntity};
use crate::domain::PatientRecord;
use crate::errors::{AppError, AppResult};

/// Patient record repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PatientRecordRepository: Send + Sync {
    async fn create(
        &self,
        patient_id: Uuid,
        clinic_id: Uuid,
        procedure: String,
    ) -> AppResult<PatientRecord>;

    /// A patient's history, newest first.
    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientRecord>>;
}

/// SeaORM-backed patient record store.
pub struct PatientRecordStore {
    db: DatabaseConnection,
}

impl PatientRecordStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PatientRecordRepository for PatientRecordStore {
    async fn create(
        &self,
        patient_id: Uuid,
        clinic_id: Uuid,
        procedure: String,
    ) -> AppResult<PatientRecord> {
        let active_model = patient_record::ActiveModel {
            id: Set(Uuid::new_v4()),
            patient_id: Set(patient_id),
            clinic_id: Set(clinic_id),
            procedure: Set(procedure),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(PatientRecord::from(model))
    }

    async fn list_by_patient(&self, patient_id: Uuid) -> AppResult<Vec<PatientRecord>> {
        let models = PatientRecordEntity::find()
            .filter(patient_record::Column::PatientId.eq(patient_id))
            .order_by_desc(patient_record::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(PatientRecord::from).collect())
    }
}
