//! Appointment handlers - booking, lifecycle and listings.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{AppointmentResponse, BookAppointment, CompletionDetails, Identity};
use crate::errors::AppResult;

/// Patient-side appointment routes.
pub fn appointment_patient_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(book))
        .route("/me", get(my_appointments))
}

/// Routes open to any authenticated caller; service-level policy
/// decides per resource.
pub fn appointment_shared_routes() -> Router<AppState> {
    Router::new().route("/:id", get(get_appointment).delete(cancel_appointment))
}

/// Owner-side appointment routes.
pub fn appointment_owner_routes() -> Router<AppState> {
    Router::new()
        .route("/owner/mine", get(clinic_appointments))
        .route("/:id/done", patch(finalize_appointment))
}

/// Book an appointment
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    request_body = BookAppointment,
    responses(
        (status = 201, description = "Appointment booked", body = AppointmentResponse),
        (status = 400, description = "Invalid timestamp"),
        (status = 404, description = "Clinic not found")
    )
)]
pub async fn book(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(payload): Json<BookAppointment>,
) -> AppResult<(StatusCode, Json<AppointmentResponse>)> {
    let appointment = state
        .appointment_service
        .book(&identity, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List the caller's own appointments
#[utoipa::path(
    get,
    path = "/appointments/me",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own appointments", body = [AppointmentResponse])
    )
)]
pub async fn my_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<AppointmentResponse>>> {
    let appointments = state.appointment_service.my_appointments(&identity).await?;
    Ok(Json(appointments))
}

/// Fetch one appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment found", body = AppointmentResponse),
        (status = 403, description = "Not the booking patient"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<AppointmentResponse>> {
    let appointment = state
        .appointment_service
        .get_appointment(&identity, id)
        .await?;
    Ok(Json(appointment))
}

/// Cancel an appointment; responds with the patient's remaining ones
#[utoipa::path(
    delete,
    path = "/appointments/{id}",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Remaining appointments", body = [AppointmentResponse]),
        (status = 403, description = "Not the booking patient"),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<AppointmentResponse>>> {
    let remaining = state.appointment_service.cancel(&identity, id).await?;
    Ok(Json(remaining))
}

/// Appointments across the caller's clinics
#[utoipa::path(
    get,
    path = "/appointments/owner/mine",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Clinic appointments", body = [AppointmentResponse]),
        (status = 403, description = "Caller is not an owner")
    )
)]
pub async fn clinic_appointments(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<AppointmentResponse>>> {
    let appointments = state
        .appointment_service
        .clinic_appointments(&identity)
        .await?;
    Ok(Json(appointments))
}

/// Finalize an appointment with completion details
#[utoipa::path(
    patch,
    path = "/appointments/{id}/done",
    tag = "Appointments",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = CompletionDetails,
    responses(
        (status = 200, description = "Appointment finalized", body = AppointmentResponse),
        (status = 403, description = "Caller does not own the clinic"),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Appointment already completed")
    )
)]
pub async fn finalize_appointment(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompletionDetails>,
) -> AppResult<Json<AppointmentResponse>> {
    let appointment = state
        .appointment_service
        .finalize(&identity, id, payload)
        .await?;
    Ok(Json(appointment))
}
