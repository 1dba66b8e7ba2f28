//! Application route configuration.
//!
//! Each route group declares its role requirement as data via
//! [`required_role`]; one generic middleware step enforces it after the
//! identity middleware has resolved the caller.

use axum::{
    extract::State, http::HeaderValue, http::StatusCode, middleware, response::Json, routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    admin_routes, appointment_owner_routes, appointment_patient_routes,
    appointment_shared_routes, auth_routes, chat_routes, clinic_admin_routes,
    clinic_owner_routes, clinic_public_routes, patient_routes, patient_shared_routes,
};
use super::middleware::{identity_middleware, required_role, role_middleware};
use super::openapi::ApiDoc;
use super::AppState;
use crate::domain::UserRole;
use crate::infra::XRAY_URL_PREFIX;

/// Attach identity resolution and a role requirement to a route group.
fn protected(router: Router<AppState>, state: &AppState, role: Option<UserRole>) -> Router<AppState> {
    let router = match role {
        Some(role) => router
            .route_layer(middleware::from_fn(role_middleware))
            .route_layer(required_role(role)),
        None => router,
    };
    router.route_layer(middleware::from_fn_with_state(
        state.clone(),
        identity_middleware,
    ))
}

/// Create the application router with all routes configured
pub fn create_router(state: AppState) -> Router {
    let clinics = clinic_public_routes()
        .merge(protected(
            clinic_owner_routes(),
            &state,
            Some(UserRole::Owner),
        ))
        .merge(protected(
            clinic_admin_routes(),
            &state,
            Some(UserRole::Admin),
        ));

    let appointments = protected(appointment_shared_routes(), &state, None)
        .merge(protected(
            appointment_patient_routes(),
            &state,
            Some(UserRole::Patient),
        ))
        .merge(protected(
            appointment_owner_routes(),
            &state,
            Some(UserRole::Owner),
        ));

    let patients = protected(patient_routes(), &state, Some(UserRole::Patient))
        .merge(protected(patient_shared_routes(), &state, None));

    let admin = protected(admin_routes(), &state, Some(UserRole::Admin));

    let mut cors = CorsLayer::permissive();
    if let Some(origin) = state
        .frontend_origin
        .as_deref()
        .and_then(|o| o.parse::<HeaderValue>().ok())
    {
        cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any);
    }

    Router::new()
        // Health check endpoints
        .route("/", get(root))
        .route("/health", get(health))
        // OpenAPI Swagger UI documentation
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Stored X-ray images
        .nest_service(XRAY_URL_PREFIX, ServeDir::new(&state.xray_dir))
        .nest("/auth", auth_routes())
        .nest("/clinics", clinics)
        .nest("/appointments", appointments)
        .nest("/patients", patients)
        .nest("/admin", admin)
        .nest("/chat", chat_routes())
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Root endpoint
async fn root() -> &'static str {
    "DentalChain API"
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    database: ServiceStatus,
}

/// Service status
#[derive(Serialize)]
struct ServiceStatus {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Health check endpoint with database connectivity check
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = match state.database.ping().await {
        Ok(_) => ServiceStatus {
            status: "healthy",
            error: None,
        },
        Err(e) => ServiceStatus {
            status: "unhealthy",
            error: Some(e.to_string()),
        },
    };

    let healthy = db_status.status == "healthy";
    let response = HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        database: db_status,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
