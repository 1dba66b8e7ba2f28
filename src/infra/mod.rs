//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connections and repositories
//! - File storage for uploads
//! - Unit of Work for centralized repository access

pub mod db;
pub mod repositories;
pub mod storage;
pub mod unit_of_work;

pub use db::{Database, Migrator};
pub use repositories::{
    AppointmentRepository, AppointmentStore, ClinicRepository, ClinicStore, NewAppointment,
    NewClinic, PatientRecordRepository, PatientRecordStore, UserPatch, UserRepository, UserStore,
    XrayRepository, XrayStore,
};
pub use storage::{StoredFile, XrayStorage, XRAY_URL_PREFIX};
pub use unit_of_work::{Persistence, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use repositories::{
    MockAppointmentRepository, MockClinicRepository, MockPatientRecordRepository,
    MockUserRepository, MockXrayRepository,
};
