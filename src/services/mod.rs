//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.

mod appointment_service;
mod auth_service;
mod chat_service;
mod clinic_service;
pub mod container;
mod user_service;
mod xray_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use appointment_service::{
    AdminCreateAppointment, AdminUpdateAppointment, AppointmentManager, AppointmentService,
};
pub use auth_service::{AuthResponse, AuthService, Authenticator, Claims};
pub use chat_service::{ChatMessage, ChatProxy, ChatService};
pub use clinic_service::{ClinicManager, ClinicService, CreatedClinic, OwnerCredentials};
pub use user_service::{UserManager, UserService};
pub use xray_service::{XrayManager, XrayService};
