//! Clinic repository - persistence for clinics.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::clinic::{self, Entity as ClinicEntity};
use crate::domain::{Clinic, GeoPoint, UpdateClinic};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Data required to insert a clinic row.
#[derive(Debug, Clone)]
pub struct NewClinic {
    pub name: String,
    pub email: String,
    pub address: String,
    pub phone: String,
    pub description: String,
    pub image: String,
    pub owner_id: Option<Uuid>,
    pub location: Option<GeoPoint>,
}

/// Clinic repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ClinicRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Clinic>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Clinic>>;

    async fn find_many_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Clinic>>;

    async fn create(&self, data: NewClinic) -> AppResult<Clinic>;

    /// Apply an owner-side patch; `None` fields keep current values.
    async fn update(&self, id: Uuid, patch: UpdateClinic) -> AppResult<Clinic>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// All clinics, newest first (public browse).
    async fn list_all(&self) -> AppResult<Vec<Clinic>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Clinic>>;

    /// Paginated admin listing with optional substring and owner filters.
    async fn list(
        &self,
        q: Option<String>,
        owner_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Clinic>, u64)>;
}

/// SeaORM-backed clinic store.
pub struct ClinicStore {
    db: DatabaseConnection,
}

impl ClinicStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn list_condition(q: Option<&str>, owner_id: Option<Uuid>) -> Condition {
        let mut cond = Condition::all();
        if let Some(owner_id) = owner_id {
            cond = cond.add(clinic::Column::OwnerId.eq(owner_id));
        }
        if let Some(q) = q {
            cond = cond.add(
                Condition::any()
                    .add(clinic::Column::Name.contains(q))
                    .add(clinic::Column::Email.contains(q))
                    .add(clinic::Column::Address.contains(q)),
            );
        }
        cond
    }
}

#[async_trait]
impl ClinicRepository for ClinicStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Clinic>> {
        let result = ClinicEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Clinic::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Clinic>> {
        let result = ClinicEntity::find()
            .filter(clinic::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(Clinic::from))
    }

    async fn find_many_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<Clinic>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = ClinicEntity::find()
            .filter(clinic::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Clinic::from).collect())
    }

    async fn create(&self, data: NewClinic) -> AppResult<Clinic> {
        let now = chrono::Utc::now();
        let active_model = clinic::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(data.name),
            email: Set(data.email),
            address: Set(data.address),
            phone: Set(data.phone),
            description: Set(data.description),
            image: Set(data.image),
            owner_id: Set(data.owner_id),
            location_lat: Set(data.location.map(|l| l.lat)),
            location_lng: Set(data.location.map(|l| l.lng)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Clinic::from(model))
    }

    async fn update(&self, id: Uuid, patch: UpdateClinic) -> AppResult<Clinic> {
        let existing = ClinicEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: clinic::ActiveModel = existing.into();
        if let Some(address) = patch.address {
            active.address = Set(address);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(image) = patch.image {
            active.image = Set(image);
        }
        if let Some(location) = patch.location {
            active.location_lat = Set(Some(location.lat));
            active.location_lng = Set(Some(location.lng));
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Clinic::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = ClinicEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list_all(&self) -> AppResult<Vec<Clinic>> {
        let models = ClinicEntity::find()
            .order_by_desc(clinic::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Clinic::from).collect())
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Clinic>> {
        let models = ClinicEntity::find()
            .filter(clinic::Column::OwnerId.eq(owner_id))
            .order_by_desc(clinic::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(Clinic::from).collect())
    }

    async fn list(
        &self,
        q: Option<String>,
        owner_id: Option<Uuid>,
        params: PaginationParams,
    ) -> AppResult<(Vec<Clinic>, u64)> {
        let cond = Self::list_condition(q.as_deref(), owner_id);

        let total = ClinicEntity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = ClinicEntity::find()
            .filter(cond)
            .order_by_desc(clinic::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(Clinic::from).collect(), total))
    }
}
