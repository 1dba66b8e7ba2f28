//! HTTP request handlers.

pub mod admin_handler;
pub mod appointment_handler;
pub mod auth_handler;
pub mod chat_handler;
pub mod clinic_handler;
pub mod patient_handler;

pub use admin_handler::admin_routes;
pub use appointment_handler::{
    appointment_owner_routes, appointment_patient_routes, appointment_shared_routes,
};
pub use auth_handler::auth_routes;
pub use chat_handler::chat_routes;
pub use clinic_handler::{clinic_admin_routes, clinic_owner_routes, clinic_public_routes};
pub use patient_handler::{patient_routes, patient_shared_routes};
