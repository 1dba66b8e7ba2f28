//! JWT authentication middleware and declarative role requirements.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    Extension,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{require_role, Identity, UserRole};
use crate::errors::AppError;

/// Authentication middleware.
///
/// Extracts the bearer token, verifies it and re-resolves the subject
/// against the users table, then injects the resulting [`Identity`]
/// into the request extensions. A token whose subject no longer exists
/// is rejected here with 401.
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let identity = state.auth_service.resolve_identity(token).await?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

/// A route's role requirement, attached as route data.
///
/// `None` admits any authenticated caller; admins always pass. Routes
/// declare this once via [`required_role`] instead of each carrying a
/// bespoke role check.
#[derive(Clone, Copy, Debug)]
pub struct RequiredRole(pub Option<UserRole>);

/// Enforce the [`RequiredRole`] attached to the matched route.
///
/// Runs after [`identity_middleware`]; a route with no declared
/// requirement admits any authenticated caller.
pub async fn role_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or(AppError::Unauthorized)?;

    let required = request
        .extensions()
        .get::<RequiredRole>()
        .copied()
        .unwrap_or(RequiredRole(None));

    require_role(identity, required.0)?;

    Ok(next.run(request).await)
}

/// Layer declaring the role a route group requires.
pub fn required_role(role: UserRole) -> Extension<RequiredRole> {
    Extension(RequiredRole(Some(role)))
}
