//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    admin_handler, appointment_handler, auth_handler, chat_handler, clinic_handler,
    patient_handler,
};
use crate::domain::{
    AppointmentResponse, AppointmentStatus, BookAppointment, ClinicResponse, ClinicSummary,
    CompletionDetails, CreateClinic, GeoPoint, PatientRecordResponse, UpdateClinic, UpdateUser,
    UserResponse, UserSummary, XrayMeta, XrayResponse,
};
use crate::services::{
    AdminCreateAppointment, AdminUpdateAppointment, AuthResponse, ChatMessage, CreatedClinic,
    OwnerCredentials,
};
use crate::types::{
    MessageResponse, PaginatedAppointments, PaginatedClinics, PaginatedUsers,
};

/// OpenAPI documentation for the DentalChain API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "DentalChain API",
        version = "0.1.0",
        description = "Clinic booking backend: patients browse clinics, book appointments and upload X-rays; owners manage and finalize appointments; admins manage everything.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5001", description = "Local development server")
    ),
    paths(
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        // Clinic endpoints
        clinic_handler::list_clinics,
        clinic_handler::get_clinic_by_email,
        clinic_handler::my_clinics,
        clinic_handler::update_clinic,
        clinic_handler::create_clinic,
        // Appointment endpoints
        appointment_handler::book,
        appointment_handler::my_appointments,
        appointment_handler::get_appointment,
        appointment_handler::cancel_appointment,
        appointment_handler::clinic_appointments,
        appointment_handler::finalize_appointment,
        // Patient endpoints
        patient_handler::upload_xray,
        patient_handler::my_xrays,
        patient_handler::delete_xray,
        patient_handler::patient_records,
        // Admin endpoints
        admin_handler::list_users,
        admin_handler::create_user,
        admin_handler::get_user,
        admin_handler::update_user,
        admin_handler::delete_user,
        admin_handler::list_clinics,
        admin_handler::get_clinic,
        admin_handler::update_clinic,
        admin_handler::delete_clinic,
        admin_handler::list_appointments,
        admin_handler::create_appointment,
        admin_handler::get_appointment,
        admin_handler::update_appointment,
        admin_handler::delete_appointment,
        admin_handler::list_xrays,
        admin_handler::delete_xray,
        // Chat
        chat_handler::chat,
    ),
    components(
        schemas(
            // Domain types
            UserResponse,
            UserSummary,
            UpdateUser,
            ClinicResponse,
            ClinicSummary,
            CreateClinic,
            UpdateClinic,
            GeoPoint,
            AppointmentResponse,
            AppointmentStatus,
            BookAppointment,
            CompletionDetails,
            PatientRecordResponse,
            XrayResponse,
            XrayMeta,
            // Service types
            AuthResponse,
            AdminCreateAppointment,
            AdminUpdateAppointment,
            CreatedClinic,
            OwnerCredentials,
            ChatMessage,
            // Handler types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            clinic_handler::CreateClinicRequest,
            admin_handler::CreateUserRequest,
            chat_handler::ChatRequest,
            chat_handler::ChatReply,
            MessageResponse,
            PaginatedUsers,
            PaginatedClinics,
            PaginatedAppointments,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration and login"),
        (name = "Clinics", description = "Clinic browsing and management"),
        (name = "Appointments", description = "Booking and lifecycle"),
        (name = "Patients", description = "X-rays and procedure history"),
        (name = "Admin", description = "Administrative management"),
        (name = "Chat", description = "Dental assistant proxy")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_builds_with_all_routes() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        // Multipart upload route must survive schema generation.
        assert!(paths.contains_key("/patients/upload-xray"));
        // Admin appointment surface is full CRUD.
        assert!(paths.contains_key("/admin/appointments"));
        assert!(paths.contains_key("/admin/appointments/{id}"));

        use utoipa::openapi::PathItemType;
        let admin_appointments = &paths["/admin/appointments"];
        assert!(admin_appointments.operations.contains_key(&PathItemType::Get));
        assert!(admin_appointments.operations.contains_key(&PathItemType::Post));
        let admin_appointment = &paths["/admin/appointments/{id}"];
        assert!(admin_appointment.operations.contains_key(&PathItemType::Get));
        assert!(admin_appointment.operations.contains_key(&PathItemType::Put));
        assert!(admin_appointment.operations.contains_key(&PathItemType::Delete));
    }
}
