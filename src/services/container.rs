//! Service container - centralized service access.
//!
//! Handlers depend on this trait so every service can be swapped for a
//! mock in tests.

use std::sync::Arc;

use super::{
    AppointmentService, AuthService, ChatService, ClinicService, UserService, XrayService,
};
use crate::config::Config;
use crate::infra::{Persistence, XrayStorage};

/// Service container trait for dependency injection.
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;
    fn users(&self) -> Arc<dyn UserService>;
    fn clinics(&self) -> Arc<dyn ClinicService>;
    fn appointments(&self) -> Arc<dyn AppointmentService>;
    fn xrays(&self) -> Arc<dyn XrayService>;
    fn chat(&self) -> Arc<dyn ChatService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    clinic_service: Arc<dyn ClinicService>,
    appointment_service: Arc<dyn AppointmentService>,
    xray_service: Arc<dyn XrayService>,
    chat_service: Arc<dyn ChatService>,
}

impl Services {
    /// Create service container from database connection and config.
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{
            AppointmentManager, Authenticator, ChatProxy, ClinicManager, UserManager, XrayManager,
        };

        let storage = XrayStorage::new(config.xray_dir.clone());
        let uow = Arc::new(Persistence::new(db));

        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone(), config.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            clinic_service: Arc::new(ClinicManager::new(uow.clone())),
            appointment_service: Arc::new(AppointmentManager::new(uow.clone())),
            xray_service: Arc::new(XrayManager::new(uow, storage)),
            chat_service: Arc::new(ChatProxy::new(&config)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicService> {
        self.clinic_service.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentService> {
        self.appointment_service.clone()
    }

    fn xrays(&self) -> Arc<dyn XrayService> {
        self.xray_service.clone()
    }

    fn chat(&self) -> Arc<dyn ChatService> {
        self.chat_service.clone()
    }
}
