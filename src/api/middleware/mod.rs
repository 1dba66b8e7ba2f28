//! API middleware.

mod auth;

pub use auth::{identity_middleware, required_role, role_middleware, RequiredRole};
