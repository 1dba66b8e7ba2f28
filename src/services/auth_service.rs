//! Authentication service - registration, login and identity resolution.
//!
//! Tokens carry only the subject id plus denormalized email/role; every
//! request re-resolves the subject against the users table so role
//! changes and deletions take effect immediately.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Identity, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Response returned after successful registration or login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account and log it in. `role` defaults to
    /// patient when absent.
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
        role: Option<String>,
    ) -> AppResult<AuthResponse>;

    /// Login and return a JWT token with the user profile.
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Verify JWT token signature and expiry, extract claims.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a bearer token to a live identity.
    ///
    /// The subject is re-fetched from storage; a token whose subject no
    /// longer exists is rejected as unauthorized, and the role used for
    /// authorization is the stored one, not the one baked into the
    /// token at issue time.
    async fn resolve_identity(&self, token: &str) -> AppResult<Identity>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        email: String,
        password: String,
        full_name: String,
        role: Option<String>,
    ) -> AppResult<AuthResponse> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let role = match role.as_deref() {
            None | Some("") => UserRole::Patient,
            Some(value) => UserRole::parse(value)
                .ok_or_else(|| AppError::validation(format!("Unknown role: {value}")))?,
        };

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .uow
            .users()
            .create(email, password_hash, full_name, role)
            .await?;

        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        let user = user_result.unwrap();
        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn resolve_identity(&self, token: &str) -> AppResult<Identity> {
        let claims = self.verify_token(token)?;

        let user = self
            .uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(Identity {
            id: user.id,
            role: user.role,
            email: user.email,
            full_name: user.full_name,
        })
    }
}
