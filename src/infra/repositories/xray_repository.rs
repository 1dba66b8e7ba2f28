//! X-ray repository - stored upload metadata for patient imaging.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::xray::{self, Entity as XrayEntity};
use crate::domain::{XrayMeta, XrayRecord};
use crate::errors::{AppError, AppResult};

/// X-ray repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait XrayRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<XrayRecord>>;

    async fn create(&self, patient_user_id: Uuid, url: String, meta: XrayMeta)
        -> AppResult<XrayRecord>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// A single patient's uploads, newest first.
    async fn list_by_patient(&self, patient_user_id: Uuid) -> AppResult<Vec<XrayRecord>>;

    /// Admin listing, optionally narrowed to one patient.
    async fn list_filtered(&self, patient_user_id: Option<Uuid>) -> AppResult<Vec<XrayRecord>>;
}

/// SeaORM-backed x-ray store.
pub struct XrayStore {
    db: DatabaseConnection,
}

impl XrayStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl XrayRepository for XrayStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<XrayRecord>> {
        let result = XrayEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(XrayRecord::from))
    }

    async fn create(
        &self,
        patient_user_id: Uuid,
        url: String,
        meta: XrayMeta,
    ) -> AppResult<XrayRecord> {
        let active_model = xray::ActiveModel {
            id: Set(Uuid::new_v4()),
            patient_user_id: Set(patient_user_id),
            url: Set(url),
            original_name: Set(meta.original_name),
            mime_type: Set(meta.mime_type),
            size: Set(meta.size),
            created_at: Set(chrono::Utc::now()),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(XrayRecord::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = XrayEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_by_patient(&self, patient_user_id: Uuid) -> AppResult<Vec<XrayRecord>> {
        let models = XrayEntity::find()
            .filter(xray::Column::PatientUserId.eq(patient_user_id))
            .order_by_desc(xray::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(XrayRecord::from).collect())
    }

    async fn list_filtered(&self, patient_user_id: Option<Uuid>) -> AppResult<Vec<XrayRecord>> {
        let mut query = XrayEntity::find();
        if let Some(patient_user_id) = patient_user_id {
            query = query.filter(xray::Column::PatientUserId.eq(patient_user_id));
        }
        let models = query
            .order_by_desc(xray::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(XrayRecord::from).collect())
    }
}
