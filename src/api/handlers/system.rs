//! System endpoints: health check, branding image, OpenAPI document.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

use crate::api::openapi::ApiDoc;
use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    open_sessions: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, current timestamp and the number of open form sessions.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            open_sessions: state.survey_service.registry().len().await,
        }),
    )
}

/// `GET /logo` — Branding image shown above the form.
#[utoipa::path(
    get,
    path = "/logo",
    tag = "System",
    summary = "Branding image",
    description = "Serves the configured logo file. Responds 404 when the file is missing; the form still works without it.",
    responses(
        (status = 200, description = "Image bytes"),
        (status = 404, description = "Logo not found"),
    )
)]
pub async fn logo_handler(State(state): State<AppState>) -> impl IntoResponse {
    match tokio::fs::read(state.logo_path.as_path()).await {
        Ok(bytes) => {
            let content_type = image_content_type(&state.logo_path);
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(err) => {
            tracing::warn!(path = %state.logo_path.display(), error = %err, "logo not found");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// `GET /api-docs/openapi.json` — OpenAPI document.
pub async fn openapi_handler() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// MIME type guessed from the file extension.
fn image_content_type(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/logo", get(logo_handler))
        .route("/api-docs/openapi.json", get(openapi_handler))
}
