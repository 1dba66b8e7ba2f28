//! Admin handlers - paginated management of users, clinics,
//! appointments and X-rays.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::clinic_handler::create_clinic;
use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{
    AppointmentResponse, ClinicResponse, Identity, UpdateClinic, UpdateUser, UserResponse,
    XrayResponse,
};
use crate::errors::AppResult;
use crate::services::{AdminCreateAppointment, AdminUpdateAppointment};
use crate::types::{MessageResponse, Paginated, PaginationParams};

/// Admin user creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[schema(example = "owner")]
    pub role: String,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct UsersFilter {
    /// Substring match against name or email
    pub q: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ClinicsFilter {
    /// Substring match against name, email or address
    pub q: Option<String>,
    /// Narrow to clinics owned by this account
    pub owner_email: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AppointmentsFilter {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct XraysFilter {
    pub patient_id: Option<Uuid>,
    pub email: Option<String>,
}

/// Create admin routes; callers are already identity-resolved and
/// role-checked by the router layers.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/clinics", get(list_clinics).post(create_clinic))
        .route(
            "/clinics/:id",
            get(get_clinic).put(update_clinic).delete(delete_clinic),
        )
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route(
            "/appointments/:id",
            get(get_appointment)
                .put(update_appointment)
                .delete(delete_appointment),
        )
        .route("/xrays", get(list_xrays))
        .route("/xrays/:id", delete(delete_xray))
}

/// List users
#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams, UsersFilter),
    responses(
        (status = 200, description = "Paginated users", body = PaginatedUsers)
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UsersFilter>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    let page = state
        .user_service
        .list_users(filter.q, filter.role, pagination)
        .await?;
    Ok(Json(Paginated {
        items: page.items.into_iter().map(UserResponse::from).collect(),
        total: page.total,
        page: page.page,
        pages: page.pages,
    }))
}

/// Create a user with an explicit role
#[utoipa::path(
    post,
    path = "/admin/users",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .create_user(
            payload.email,
            payload.password,
            payload.full_name,
            payload.role,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Fetch one user
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.get_user(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Update a user
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.user_service.update_user(id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.user_service.delete_user(id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// List clinics
#[utoipa::path(
    get,
    path = "/admin/clinics",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams, ClinicsFilter),
    responses(
        (status = 200, description = "Paginated clinics", body = PaginatedClinics)
    )
)]
pub async fn list_clinics(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ClinicsFilter>,
) -> AppResult<Json<Paginated<ClinicResponse>>> {
    let page = state
        .clinic_service
        .list_clinics_admin(filter.q, filter.owner_email, pagination)
        .await?;
    Ok(Json(page))
}

/// Fetch one clinic
#[utoipa::path(
    get,
    path = "/admin/clinics/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Clinic id")),
    responses(
        (status = 200, description = "Clinic found", body = ClinicResponse),
        (status = 404, description = "Clinic not found")
    )
)]
pub async fn get_clinic(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ClinicResponse>> {
    let clinic = state.clinic_service.get_clinic(id).await?;
    Ok(Json(clinic))
}

/// Update any clinic
#[utoipa::path(
    put,
    path = "/admin/clinics/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Clinic id")),
    request_body = UpdateClinic,
    responses(
        (status = 200, description = "Clinic updated", body = ClinicResponse),
        (status = 404, description = "Clinic not found")
    )
)]
pub async fn update_clinic(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateClinic>,
) -> AppResult<Json<ClinicResponse>> {
    let clinic = state
        .clinic_service
        .update_clinic(&identity, id, payload)
        .await?;
    Ok(Json(clinic))
}

/// Delete any clinic
#[utoipa::path(
    delete,
    path = "/admin/clinics/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Clinic id")),
    responses(
        (status = 200, description = "Clinic deleted", body = MessageResponse),
        (status = 404, description = "Clinic not found")
    )
)]
pub async fn delete_clinic(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.clinic_service.delete_clinic(&identity, id).await?;
    Ok(Json(MessageResponse::new("Clinic deleted")))
}

/// List appointments
#[utoipa::path(
    get,
    path = "/admin/appointments",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(PaginationParams, AppointmentsFilter),
    responses(
        (status = 200, description = "Paginated appointments", body = PaginatedAppointments)
    )
)]
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<AppointmentsFilter>,
) -> AppResult<Json<Paginated<AppointmentResponse>>> {
    let page = state
        .appointment_service
        .list_admin(filter.status, pagination)
        .await?;
    Ok(Json(page))
}

/// Create an appointment for any patient at any clinic
#[utoipa::path(
    post,
    path = "/admin/appointments",
    tag = "Admin",
    security(("bearer_auth" = [])),
    request_body = AdminCreateAppointment,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentResponse),
        (status = 400, description = "Malformed date or status"),
        (status = 404, description = "Clinic or patient not found")
    )
)]
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AdminCreateAppointment>,
) -> AppResult<(StatusCode, Json<AppointmentResponse>)> {
    let appointment = state.appointment_service.create_admin(payload).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Fetch one appointment
#[utoipa::path(
    get,
    path = "/admin/appointments/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment found", body = AppointmentResponse),
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

/// Update an appointment; status changes follow lifecycle rules
#[utoipa::path(
    put,
    path = "/admin/appointments/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    request_body = AdminUpdateAppointment,
    responses(
        (status = 200, description = "Appointment updated", body = AppointmentResponse),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "Invalid status transition")
    )
)]
pub async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AdminUpdateAppointment>,
) -> AppResult<Json<AppointmentResponse>> {
    let appointment = state
        .appointment_service
        .update_admin(id, payload)
        .await?;
    Ok(Json(appointment))
}

/// Delete an appointment
#[utoipa::path(
    delete,
    path = "/admin/appointments/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn delete_appointment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.appointment_service.delete_admin(id).await?;
    Ok(Json(MessageResponse::new("Appointment deleted")))
}

/// List X-ray records
#[utoipa::path(
    get,
    path = "/admin/xrays",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(XraysFilter),
    responses(
        (status = 200, description = "X-ray records", body = [XrayResponse])
    )
)]
pub async fn list_xrays(
    State(state): State<AppState>,
    Query(filter): Query<XraysFilter>,
) -> AppResult<Json<Vec<XrayResponse>>> {
    let records = state
        .xray_service
        .list_admin(filter.patient_id, filter.email)
        .await?;
    Ok(Json(records))
}

/// Delete any X-ray record
#[utoipa::path(
    delete,
    path = "/admin/xrays/{id}",
    tag = "Admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "X-ray record id")),
    responses(
        (status = 200, description = "X-ray deleted", body = MessageResponse),
        (status = 404, description = "X-ray not found")
    )
)]
pub async fn delete_xray(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.xray_service.delete(&identity, id).await?;
    Ok(Json(MessageResponse::new("X-ray deleted")))
}
