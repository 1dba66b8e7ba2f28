//! X-ray service - upload, listing and deletion of patient imaging.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MAX_XRAY_SIZE_BYTES;
use crate::domain::{authorize, Action, Identity, UserSummary, XrayMeta, XrayRecord, XrayResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::{UnitOfWork, XrayStorage};

/// X-ray service trait for dependency injection.
#[async_trait]
pub trait XrayService: Send + Sync {
    /// Persist an upload for the calling patient.
    async fn upload(
        &self,
        identity: &Identity,
        original_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<XrayResponse>;

    /// A patient's uploads; patients see only their own.
    async fn list_for_patient(
        &self,
        identity: &Identity,
        patient_user_id: Uuid,
    ) -> AppResult<Vec<XrayResponse>>;

    /// Remove one of the caller's uploads, addressed by stored
    /// filename.
    async fn delete_by_filename(&self, identity: &Identity, filename: &str) -> AppResult<()>;

    /// Remove an upload and its stored file by record id (admin path;
    /// ownership still applies for non-admin callers).
    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()>;

    /// Admin listing, optionally narrowed to one patient by id or
    /// account email. An unknown email yields an empty list.
    async fn list_admin(
        &self,
        patient_user_id: Option<Uuid>,
        email: Option<String>,
    ) -> AppResult<Vec<XrayResponse>>;
}

/// Concrete implementation of XrayService using Unit of Work and disk
/// storage.
pub struct XrayManager<U: UnitOfWork> {
    uow: Arc<U>,
    storage: XrayStorage,
}

impl<U: UnitOfWork> XrayManager<U> {
    pub fn new(uow: Arc<U>, storage: XrayStorage) -> Self {
        Self { uow, storage }
    }

    async fn with_patients(&self, records: Vec<XrayRecord>) -> AppResult<Vec<XrayResponse>> {
        let mut patient_ids: Vec<Uuid> = records.iter().map(|r| r.patient_user_id).collect();
        patient_ids.sort_unstable();
        patient_ids.dedup();

        let patients: HashMap<Uuid, UserSummary> = self
            .uow
            .users()
            .find_many_by_ids(patient_ids)
            .await?
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect();

        Ok(records
            .into_iter()
            .map(|r| {
                let patient = patients.get(&r.patient_user_id).cloned();
                XrayResponse::new(r, patient)
            })
            .collect())
    }
}

#[async_trait]
impl<U: UnitOfWork> XrayService for XrayManager<U> {
    async fn upload(
        &self,
        identity: &Identity,
        original_name: String,
        mime_type: String,
        bytes: Vec<u8>,
    ) -> AppResult<XrayResponse> {
        authorize(
            identity,
            &Action::AccessXray {
                patient_user_id: identity.id,
            },
        )?;

        if bytes.is_empty() {
            return Err(AppError::validation("Uploaded file is empty"));
        }
        if bytes.len() > MAX_XRAY_SIZE_BYTES {
            return Err(AppError::validation("Uploaded file is too large"));
        }
        if !mime_type.starts_with("image/") {
            return Err(AppError::validation("Only image uploads are accepted"));
        }

        let stored = self.storage.save(&original_name, &bytes).await?;
        let meta = XrayMeta {
            original_name,
            mime_type,
            size: bytes.len() as i64,
        };
        let record = self
            .uow
            .xrays()
            .create(identity.id, stored.url, meta)
            .await?;

        Ok(XrayResponse::new(record, None))
    }

    async fn list_for_patient(
        &self,
        identity: &Identity,
        patient_user_id: Uuid,
    ) -> AppResult<Vec<XrayResponse>> {
        // The patient must exist before ownership is examined.
        self.uow
            .users()
            .find_by_id(patient_user_id)
            .await?
            .ok_or(AppError::NotFound)?;

        authorize(identity, &Action::AccessXray { patient_user_id })?;

        let records = self.uow.xrays().list_by_patient(patient_user_id).await?;
        self.with_patients(records).await
    }

    async fn delete_by_filename(&self, identity: &Identity, filename: &str) -> AppResult<()> {
        // Lookup is scoped to the caller's own records, so a foreign
        // filename reads as not-found rather than forbidden.
        let records = self.uow.xrays().list_by_patient(identity.id).await?;
        let record = records
            .into_iter()
            .find(|r| r.filename() == filename)
            .ok_or(AppError::NotFound)?;

        authorize(
            identity,
            &Action::AccessXray {
                patient_user_id: record.patient_user_id,
            },
        )?;

        self.storage.delete(record.filename()).await?;
        self.uow.xrays().delete(record.id).await
    }

    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let record = self
            .uow
            .xrays()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        authorize(
            identity,
            &Action::AccessXray {
                patient_user_id: record.patient_user_id,
            },
        )?;

        self.storage.delete(record.filename()).await?;
        self.uow.xrays().delete(id).await
    }

    async fn list_admin(
        &self,
        patient_user_id: Option<Uuid>,
        email: Option<String>,
    ) -> AppResult<Vec<XrayResponse>> {
        let filter = match (patient_user_id, email.as_deref()) {
            (Some(id), _) => Some(id),
            (None, Some(email)) => match self.uow.users().find_by_email(email).await? {
                Some(user) => Some(user.id),
                None => return Ok(Vec::new()),
            },
            (None, None) => None,
        };

        let records = self.uow.xrays().list_filtered(filter).await?;
        self.with_patients(records).await
    }
}
