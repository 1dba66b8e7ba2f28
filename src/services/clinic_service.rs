//! Clinic service - public browsing, owner edits and admin management.

use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    authorize, Action, Clinic, ClinicResponse, CreateClinic, Identity, Password, UpdateClinic,
    UserRole, UserSummary,
};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::NewClinic;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// Credentials for an owner account provisioned during clinic creation.
///
/// Returned exactly once; the temporary password is never stored in
/// plain text.
#[derive(Debug, Serialize, ToSchema)]
pub struct OwnerCredentials {
    pub email: String,
    pub temp_password: String,
}

/// Result of an admin clinic creation.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedClinic {
    pub clinic: ClinicResponse,
    /// Present only when a new owner account was auto-provisioned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_credentials: Option<OwnerCredentials>,
}

/// Clinic service trait for dependency injection.
#[async_trait]
pub trait ClinicService: Send + Sync {
    /// Public browse: all clinics with owner summaries embedded.
    async fn list_clinics(&self) -> AppResult<Vec<ClinicResponse>>;

    async fn get_clinic(&self, id: Uuid) -> AppResult<ClinicResponse>;

    /// Public lookup by clinic email.
    async fn get_clinic_by_email(&self, email: &str) -> AppResult<ClinicResponse>;

    /// Clinics owned by the caller (admins see every clinic).
    async fn my_clinics(&self, identity: &Identity) -> AppResult<Vec<ClinicResponse>>;

    /// Owner-side edit; absent fields keep their current values.
    async fn update_clinic(
        &self,
        identity: &Identity,
        id: Uuid,
        data: UpdateClinic,
    ) -> AppResult<ClinicResponse>;

    async fn delete_clinic(&self, identity: &Identity, id: Uuid) -> AppResult<()>;

    /// Admin creation, auto-provisioning the owner account when the
    /// given owner email is unknown.
    async fn create_clinic(&self, data: CreateClinic) -> AppResult<CreatedClinic>;

    /// Paginated admin listing; `owner_email` narrows to one owner's
    /// clinics and yields an empty page when no such user exists.
    async fn list_clinics_admin(
        &self,
        q: Option<String>,
        owner_email: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ClinicResponse>>;
}

/// Concrete implementation of ClinicService using Unit of Work.
pub struct ClinicManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> ClinicManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Batch-resolve owner summaries for a set of clinics.
    async fn owner_summaries(
        &self,
        clinics: &[Clinic],
    ) -> AppResult<HashMap<Uuid, UserSummary>> {
        let owner_ids: Vec<Uuid> = clinics.iter().filter_map(|c| c.owner_id).collect();
        let owners = self.uow.users().find_many_by_ids(owner_ids).await?;
        Ok(owners
            .iter()
            .map(|u| (u.id, UserSummary::from(u)))
            .collect())
    }

    async fn with_owners(&self, clinics: Vec<Clinic>) -> AppResult<Vec<ClinicResponse>> {
        let owners = self.owner_summaries(&clinics).await?;
        Ok(clinics
            .into_iter()
            .map(|clinic| {
                let owner = clinic.owner_id.and_then(|id| owners.get(&id).cloned());
                ClinicResponse::new(clinic, owner)
            })
            .collect())
    }

    async fn load_with_owner(&self, clinic: Clinic) -> AppResult<ClinicResponse> {
        let owner = match clinic.owner_id {
            Some(owner_id) => self
                .uow
                .users()
                .find_by_id(owner_id)
                .await?
                .map(|u| UserSummary::from(&u)),
            None => None,
        };
        Ok(ClinicResponse::new(clinic, owner))
    }

    /// Find or provision the owner account for a new clinic.
    async fn resolve_owner(
        &self,
        owner_email: &str,
        owner_full_name: Option<String>,
    ) -> AppResult<(Uuid, Option<OwnerCredentials>)> {
        if let Some(existing) = self.uow.users().find_by_email(owner_email).await? {
            // Existing patients are promoted; owners and admins keep
            // their role.
            if existing.role == UserRole::Patient {
                let patch = crate::infra::repositories::UserPatch {
                    full_name: None,
                    email: None,
                    password_hash: None,
                    role: Some(UserRole::Owner),
                };
                self.uow.users().update(existing.id, patch).await?;
            }
            return Ok((existing.id, None));
        }

        let temp_password = Password::generate_temporary();
        let password_hash = Password::new(&temp_password)?.into_string();
        let full_name = owner_full_name.unwrap_or_else(|| owner_email.to_string());
        let owner = self
            .uow
            .users()
            .create(
                owner_email.to_string(),
                password_hash,
                full_name,
                UserRole::Owner,
            )
            .await?;

        Ok((
            owner.id,
            Some(OwnerCredentials {
                email: owner.email,
                temp_password,
            }),
        ))
    }
}

#[async_trait]
impl<U: UnitOfWork> ClinicService for ClinicManager<U> {
    async fn list_clinics(&self) -> AppResult<Vec<ClinicResponse>> {
        let clinics = self.uow.clinics().list_all().await?;
        self.with_owners(clinics).await
    }

    async fn get_clinic(&self, id: Uuid) -> AppResult<ClinicResponse> {
        let clinic = self
            .uow
            .clinics()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;
        self.load_with_owner(clinic).await
    }

    async fn get_clinic_by_email(&self, email: &str) -> AppResult<ClinicResponse> {
        let clinic = self
            .uow
            .clinics()
            .find_by_email(email)
            .await?
            .ok_or(AppError::NotFound)?;
        self.load_with_owner(clinic).await
    }

    async fn my_clinics(&self, identity: &Identity) -> AppResult<Vec<ClinicResponse>> {
        let clinics = if identity.is_admin() {
            self.uow.clinics().list_all().await?
        } else {
            self.uow.clinics().list_by_owner(identity.id).await?
        };
        self.with_owners(clinics).await
    }

    async fn update_clinic(
        &self,
        identity: &Identity,
        id: Uuid,
        data: UpdateClinic,
    ) -> AppResult<ClinicResponse> {
        // Existence before ownership: a missing clinic is 404 even for
        // a caller who would not have been allowed to touch it.
        let clinic = self
            .uow
            .clinics()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        authorize(
            identity,
            &Action::MutateClinic {
                owner_id: clinic.owner_id,
            },
        )?;

        let updated = self.uow.clinics().update(id, data).await?;
        self.load_with_owner(updated).await
    }

    async fn delete_clinic(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        let clinic = self
            .uow
            .clinics()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        authorize(
            identity,
            &Action::MutateClinic {
                owner_id: clinic.owner_id,
            },
        )?;

        // Appointments referencing the clinic are left in place and
        // render without a clinic summary.
        self.uow.clinics().delete(id).await
    }

    async fn create_clinic(&self, data: CreateClinic) -> AppResult<CreatedClinic> {
        if self.uow.clinics().find_by_email(&data.email).await?.is_some() {
            return Err(AppError::conflict("Clinic"));
        }

        let (owner_id, owner_credentials) = self
            .resolve_owner(&data.owner_email, data.owner_full_name.clone())
            .await?;

        let clinic = self
            .uow
            .clinics()
            .create(NewClinic {
                name: data.name,
                email: data.email,
                address: data.address.unwrap_or_default(),
                phone: data.phone.unwrap_or_default(),
                description: data.description.unwrap_or_default(),
                image: data.image.unwrap_or_default(),
                owner_id: Some(owner_id),
                location: data.location,
            })
            .await?;

        let clinic = self.load_with_owner(clinic).await?;
        Ok(CreatedClinic {
            clinic,
            owner_credentials,
        })
    }

    async fn list_clinics_admin(
        &self,
        q: Option<String>,
        owner_email: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<ClinicResponse>> {
        let owner_id = match owner_email.as_deref() {
            Some(email) => match self.uow.users().find_by_email(email).await? {
                Some(owner) => Some(owner.id),
                None => {
                    return Ok(Paginated::new(
                        Vec::new(),
                        params.page(),
                        params.limit(),
                        0,
                    ))
                }
            },
            None => None,
        };

        let (clinics, total) = self.uow.clinics().list(q, owner_id, params).await?;
        let items = self.with_owners(clinics).await?;
        Ok(Paginated::new(items, params.page(), params.limit(), total))
    }
}
