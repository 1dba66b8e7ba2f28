//! Patient handlers - X-ray uploads and procedure history.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::{XRAY_FIELD_NAME, XRAY_UPLOAD_BODY_LIMIT_BYTES};
use crate::domain::{Identity, PatientRecordResponse, XrayResponse};
use crate::errors::{AppError, AppResult};
use crate::types::MessageResponse;

/// Patient-side routes (uploads and own records).
pub fn patient_routes() -> Router<AppState> {
    Router::new()
        .route("/upload-xray", post(upload_xray))
        .route("/xray/mine", get(my_xrays))
        .route("/xray/:filename", delete(delete_xray))
        // Raise axum's default 2 MB body cap so large X-ray files reach
        // the service-level size check.
        .layer(DefaultBodyLimit::max(XRAY_UPLOAD_BODY_LIMIT_BYTES))
}

/// Routes shared between the patient and the admin surface.
pub fn patient_shared_routes() -> Router<AppState> {
    Router::new().route("/:id/records", get(patient_records))
}

/// Upload an X-ray image
#[utoipa::path(
    post,
    path = "/patients/upload-xray",
    tag = "Patients",
    security(("bearer_auth" = [])),
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "X-ray stored", body = XrayResponse),
        (status = 400, description = "Missing or invalid file field")
    )
)]
pub async fn upload_xray(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<XrayResponse>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some(XRAY_FIELD_NAME) {
            continue;
        }

        let original_name = field
            .file_name()
            .unwrap_or("upload.bin")
            .to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::validation(format!("failed to read upload: {e}")))?;

        let record = state
            .xray_service
            .upload(&identity, original_name, mime_type, bytes.to_vec())
            .await?;
        return Ok((StatusCode::CREATED, Json(record)));
    }

    Err(AppError::validation(format!(
        "multipart field '{XRAY_FIELD_NAME}' is required"
    )))
}

/// List the caller's X-ray records
#[utoipa::path(
    get,
    path = "/patients/xray/mine",
    tag = "Patients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own X-ray records", body = [XrayResponse])
    )
)]
pub async fn my_xrays(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> AppResult<Json<Vec<XrayResponse>>> {
    let records = state
        .xray_service
        .list_for_patient(&identity, identity.id)
        .await?;
    Ok(Json(records))
}

/// Delete one of the caller's X-rays by stored filename
#[utoipa::path(
    delete,
    path = "/patients/xray/{filename}",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("filename" = String, Path, description = "Stored filename")),
    responses(
        (status = 200, description = "X-ray deleted", body = MessageResponse),
        (status = 404, description = "No such upload for this caller")
    )
)]
pub async fn delete_xray(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(filename): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state
        .xray_service
        .delete_by_filename(&identity, &filename)
        .await?;
    Ok(Json(MessageResponse::new("X-ray deleted")))
}

/// A patient's procedure history
#[utoipa::path(
    get,
    path = "/patients/{id}/records",
    tag = "Patients",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient user id")),
    responses(
        (status = 200, description = "Procedure history", body = [PatientRecordResponse]),
        (status = 403, description = "Not the patient's own history"),
        (status = 404, description = "Patient not found")
    )
)]
pub async fn patient_records(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<PatientRecordResponse>>> {
    let records = state
        .appointment_service
        .patient_history(&identity, id)
        .await?;
    Ok(Json(records))
}
