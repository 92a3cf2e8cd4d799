//! Form description handler.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::FormSchema;

/// `GET /form` — Describe the form widgets.
#[utoipa::path(
    get,
    path = "/api/v1/form",
    tag = "Form",
    summary = "Describe the form",
    description = "Returns the page title, the coach details section and one section per event block with its widgets, options and actions. Branding reports whether the logo is available.",
    responses(
        (status = 200, description = "Form description", body = FormSchema),
    )
)]
pub async fn form_schema(State(state): State<AppState>) -> impl IntoResponse {
    let logo_available = state.logo_available().await;
    if !logo_available {
        tracing::warn!(path = %state.logo_path.display(), "logo not found");
    }
    Json(FormSchema::build(
        logo_available,
        &state.logo_path.display().to_string(),
    ))
}

/// Form routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/form", get(form_schema))
}
