//! Centralized repository access.
//!
//! Services depend on this trait instead of on individual stores so a
//! single mockable seam covers all persistence in unit tests.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{
    AppointmentRepository, AppointmentStore, ClinicRepository, ClinicStore,
    PatientRecordRepository, PatientRecordStore, UserRepository, UserStore, XrayRepository,
    XrayStore,
};

/// Unit of Work trait for dependency injection.
///
/// Provides centralized access to all repositories. For testing, hand
/// services a stub implementation backed by mockall repositories.
pub trait UnitOfWork: Send + Sync {
    fn users(&self) -> Arc<dyn UserRepository>;
    fn clinics(&self) -> Arc<dyn ClinicRepository>;
    fn appointments(&self) -> Arc<dyn AppointmentRepository>;
    fn xrays(&self) -> Arc<dyn XrayRepository>;
    fn records(&self) -> Arc<dyn PatientRecordRepository>;
}

/// Concrete implementation of UnitOfWork backed by SeaORM stores.
pub struct Persistence {
    user_repo: Arc<UserStore>,
    clinic_repo: Arc<ClinicStore>,
    appointment_repo: Arc<AppointmentStore>,
    xray_repo: Arc<XrayStore>,
    record_repo: Arc<PatientRecordStore>,
}

impl Persistence {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            clinic_repo: Arc::new(ClinicStore::new(db.clone())),
            appointment_repo: Arc::new(AppointmentStore::new(db.clone())),
            xray_repo: Arc::new(XrayStore::new(db.clone())),
            record_repo: Arc::new(PatientRecordStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn clinics(&self) -> Arc<dyn ClinicRepository> {
        self.clinic_repo.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        self.appointment_repo.clone()
    }

    fn xrays(&self) -> Arc<dyn XrayRepository> {
        self.xray_repo.clone()
    }

    fn records(&self) -> Arc<dyn PatientRecordRepository> {
        self.record_repo.clone()
    }
}
