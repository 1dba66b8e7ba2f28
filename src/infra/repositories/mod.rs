//! Repository layer - Data access abstraction
//!
//! Repositories provide an abstraction over data persistence,
//! following the Repository pattern for clean separation of concerns.

mod appointment_repository;
pub(crate) mod entities;
mod clinic_repository;
mod patient_record_repository;
mod user_repository;
mod xray_repository;

pub use appointment_repository::{AppointmentRepository, AppointmentStore, NewAppointment};
pub use clinic_repository::{ClinicRepository, ClinicStore, NewClinic};
pub use patient_record_repository::{PatientRecordRepository, PatientRecordStore};
pub use user_repository::{UserPatch, UserRepository, UserStore};
pub use xray_repository::{XrayRepository, XrayStore};

// Export mocks for tests (both unit and integration)
#[cfg(any(test, feature = "test-utils"))]
pub use appointment_repository::MockAppointmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use clinic_repository::MockClinicRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use patient_record_repository::MockPatientRecordRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use xray_repository::MockXrayRepository;
