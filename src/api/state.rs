//! Application state - Dependency injection container.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::Database;
use crate::services::{
    AppointmentService, AuthService, ChatService, ClinicService, ServiceContainer, Services,
    UserService, XrayService,
};

/// Application state containing all services (DI container).
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub user_service: Arc<dyn UserService>,
    pub clinic_service: Arc<dyn ClinicService>,
    pub appointment_service: Arc<dyn AppointmentService>,
    pub xray_service: Arc<dyn XrayService>,
    pub chat_service: Arc<dyn ChatService>,
    /// Database connection, kept for the health check.
    pub database: Arc<Database>,
    /// Directory uploads are served from.
    pub xray_dir: String,
    /// Allowed CORS origin for the frontend.
    pub frontend_origin: Option<String>,
}

impl AppState {
    /// Create application state from database connection and config.
    pub fn from_config(database: Arc<Database>, config: Config) -> Self {
        let xray_dir = config.xray_dir.clone();
        let frontend_origin = config.frontend_origin.clone();
        let container = Services::from_connection(database.get_connection(), config);

        Self {
            auth_service: container.auth(),
            user_service: container.users(),
            clinic_service: container.clinics(),
            appointment_service: container.appointments(),
            xray_service: container.xrays(),
            chat_service: container.chat(),
            database,
            xray_dir,
            frontend_origin,
        }
    }
}
