//! User repository - persistence for user accounts.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::user::{self, Entity as UserEntity};
use crate::domain::{User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Field updates applied by the admin user CRUD. `None` keeps the
/// current value.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<UserRole>,
}

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_many_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;

    async fn create(
        &self,
        email: String,
        password_hash: String,
        full_name: String,
        role: UserRole,
    ) -> AppResult<User>;

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<User>;

    /// Hard delete; users are never soft-deleted.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Paginated listing with optional name/email substring and role filters.
    async fn list(
        &self,
        q: Option<String>,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)>;
}

/// SeaORM-backed user store.
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn list_condition(q: Option<&str>, role: Option<UserRole>) -> Condition {
        let mut cond = Condition::all();
        if let Some(role) = role {
            cond = cond.add(user::Column::Role.eq(role.as_str()));
        }
        if let Some(q) = q {
            let pattern = format!("%{}%", q);
            cond = cond.add(
                Condition::any()
                    .add(user::Column::FullName.contains(q))
                    .add(user::Column::Email.like(&pattern)),
            );
        }
        cond
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        let result = UserEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(result.map(User::from))
    }

    async fn find_many_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = UserEntity::find()
            .filter(user::Column::Id.is_in(ids))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(User::from).collect())
    }

    async fn create(
        &self,
        email: String,
        password_hash: String,
        full_name: String,
        role: UserRole,
    ) -> AppResult<User> {
        let now = chrono::Utc::now();
        let active_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email),
            password_hash: Set(password_hash),
            full_name: Set(full_name),
            role: Set(role.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> AppResult<User> {
        let existing = UserEntity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: user::ActiveModel = existing.into();
        if let Some(full_name) = patch.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(hash) = patch.password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(role) = patch.role {
            active.role = Set(role.as_str().to_string());
        }
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(User::from(model))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = UserEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    async fn list(
        &self,
        q: Option<String>,
        role: Option<UserRole>,
        params: PaginationParams,
    ) -> AppResult<(Vec<User>, u64)> {
        let cond = Self::list_condition(q.as_deref(), role);

        let total = UserEntity::find()
            .filter(cond.clone())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        let models = UserEntity::find()
            .filter(cond)
            .order_by_desc(user::Column::CreatedAt)
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((models.into_iter().map(User::from).collect(), total))
    }
}
