//! Clinic handlers - public browsing, owner management and admin
//! creation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Extension, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::domain::{ClinicResponse, CreateClinic, GeoPoint, Identity, UpdateClinic};
use crate::errors::AppResult;
use crate::services::CreatedClinic;

/// Clinic creation request (admin)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateClinicRequest {
    #[validate(length(min = 1, message = "Clinic name is required"))]
    #[schema(example = "Smile Dental")]
    pub name: String,
    #[validate(email(message = "Invalid clinic email format"))]
    #[schema(example = "clinic@example.com")]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Owner account email; auto-provisioned when unknown
    #[validate(email(message = "Invalid owner email format"))]
    #[schema(example = "owner@example.com")]
    pub owner_email: String,
    #[serde(default)]
    pub owner_full_name: Option<String>,
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl From<CreateClinicRequest> for CreateClinic {
    fn from(req: CreateClinicRequest) -> Self {
        CreateClinic {
            name: req.name,
            email: req.email,
            address: req.address,
            phone: req.phone,
            description: req.description,
            image: req.image,
            owner_email: req.owner_email,
            owner_full_name: req.owner_full_name,
            location: req.location,
        }
    }
}

/// Public clinic routes (no authentication).
///
/// The `:clinic` segment is the clinic email for the public lookup and
/// the clinic id for the owner-side update; the two groups share the
/// parameter name because they merge into one router.
pub fn clinic_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_clinics))
        .route("/:clinic", get(get_clinic_by_email))
}

/// Owner-side clinic routes.
pub fn clinic_owner_routes() -> Router<AppState> {
    Router::new()
        .route("/owner/mine/list", get(my_clinics))
        .route("/:clinic", put(update_clinic))
}

/// Admin-side clinic creation.
pub fn clinic_admin_routes() -> Router<AppState> {
    Router::new().route("/", post(create_clinic))
}

/// List all clinics
#[utoipa::path(
    get,
    path = "/clinics",
    tag = "Clinics",
    responses(
        (status = 200, description = "All clinics", body = [ClinicResponse])
    )
)]
pub async fn list_clinics(State(state): State<AppState>) -> AppResult<Json<Vec<ClinicResponse>>> {
    let clinics = state.clinic_service.list_clinics().await?;
    Ok(Json(clinics))
}

/// Fetch one clinic by email
#[utoipa::path(
    get,
    path = "/clinics/{email}",
    tag = "Clinics",
    params(("email" = String, Path, description = "Clinic email address")),
    responses(
        (status = 200, description = "Clinic found", body = ClinicResponse),
        (status = 404, description = "No clinic with that email")
    )
)]
pub async fn get_clinic_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> AppResult<Json<ClinicResponse>> {
    let clinic = state.clinic_service.get_clinic_by_email(&email).await?;
    Ok(Json(clinic))
}

/// List the caller's own clinics
#[utoipa::path(
    get,
    path = "/clinics/owner/mine/list",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Clinics owned by the caller", body = [ClinicResponse]),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not an owner")
    )
)]
pub async fn my_clinics(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<ClinicResponse>>> {
    let clinics = state.clinic_service.my_clinics(&identity).await?;
    Ok(Json(clinics))
}

/// Update a clinic the caller owns
#[utoipa::path(
    put,
    path = "/clinics/{clinic_id}",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    params(("clinic_id" = Uuid, Path, description = "Clinic id")),
    request_body = UpdateClinic,
    responses(
        (status = 200, description = "Clinic updated", body = ClinicResponse),
        (status = 403, description = "Caller does not own the clinic"),
        (status = 404, description = "Clinic not found")
    )
)]
pub async fn update_clinic(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(clinic_id): Path<Uuid>,
    Json(payload): Json<UpdateClinic>,
) -> AppResult<Json<ClinicResponse>> {
    let clinic = state
        .clinic_service
        .update_clinic(&identity, clinic_id, payload)
        .await?;
    Ok(Json(clinic))
}

/// Create a clinic, provisioning its owner account when needed
#[utoipa::path(
    post,
    path = "/clinics",
    tag = "Clinics",
    security(("bearer_auth" = [])),
    request_body = CreateClinicRequest,
    responses(
        (status = 201, description = "Clinic created", body = CreatedClinic),
        (status = 403, description = "Caller is not an admin"),
        (status = 409, description = "Clinic email already registered")
    )
)]
pub async fn create_clinic(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateClinicRequest>,
) -> AppResult<(StatusCode, Json<CreatedClinic>)> {
    let created = state.clinic_service.create_clinic(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
