//! Domain layer - Core business entities and logic
//!
//! Contains the entities, the access policy evaluator, and the
//! appointment lifecycle state machine, independent of infrastructure
//! concerns.

pub mod appointment;
pub mod clinic;
pub mod password;
pub mod patient_record;
pub mod policy;
pub mod user;
pub mod xray;

pub use appointment::{
    Appointment, AppointmentResponse, AppointmentStatus, BookAppointment, CompletionDetails,
};
pub use clinic::{Clinic, ClinicResponse, ClinicSummary, CreateClinic, GeoPoint, UpdateClinic};
pub use password::Password;
pub use patient_record::{PatientRecord, PatientRecordResponse};
pub use policy::{authorize, require_role, Action, Denial, Identity};
pub use user::{UpdateUser, User, UserResponse, UserRole, UserSummary};
pub use xray::{XrayMeta, XrayRecord, XrayResponse};
