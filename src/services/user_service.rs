//! User service - admin-facing user management.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{Password, UpdateUser, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::repositories::UserPatch;
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// Paginated listing with optional name/email substring and role
    /// filters. An unknown role value is a validation error, not an
    /// empty result.
    async fn list_users(
        &self,
        q: Option<String>,
        role: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>>;

    /// Create a user with an explicit role (admin path).
    async fn create_user(
        &self,
        email: String,
        password: String,
        full_name: String,
        role: String,
    ) -> AppResult<User>;

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> AppResult<User>;

    /// Hard delete. Resources referencing the user keep their ids and
    /// render without the related summary.
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;
}

fn parse_role(role: &str) -> AppResult<UserRole> {
    UserRole::parse(role)
        .ok_or_else(|| AppError::validation(format!("Unknown role: {role}")))
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_users(
        &self,
        q: Option<String>,
        role: Option<String>,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>> {
        let role = role.as_deref().map(parse_role).transpose()?;
        let (users, total) = self.uow.users().list(q, role, params).await?;
        Ok(Paginated::new(users, params.page(), params.limit(), total))
    }

    async fn create_user(
        &self,
        email: String,
        password: String,
        full_name: String,
        role: String,
    ) -> AppResult<User> {
        let role = parse_role(&role)?;
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        self.uow
            .users()
            .create(email, password_hash, full_name, role)
            .await
    }

    async fn update_user(&self, id: Uuid, data: UpdateUser) -> AppResult<User> {
        // Ensure the target exists so an update of a ghost id is 404.
        let existing = self
            .uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(new_email) = data.email.as_deref() {
            if new_email != existing.email {
                if self.uow.users().find_by_email(new_email).await?.is_some() {
                    return Err(AppError::conflict("User"));
                }
            }
        }

        let role = data.role.as_deref().map(parse_role).transpose()?;
        let password_hash = data
            .password
            .as_deref()
            .map(|p| Password::new(p).map(Password::into_string))
            .transpose()?;

        let patch = UserPatch {
            full_name: data.full_name,
            email: data.email,
            password_hash,
            role,
        };
        self.uow.users().update(id, patch).await
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.uow.users().delete(id).await
    }
}
