//! Form session handlers: open, inspect, discard, and edit coach details.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};

use crate::api::dto::{CreateSessionResponse, SessionResponse};
use crate::app_state::AppState;
use crate::domain::{PersonalInfoPatch, SessionId};
use crate::error::{ErrorResponse, SurveyError};

/// `POST /sessions` — Open a new form session.
///
/// # Errors
///
/// Returns [`SurveyError::Internal`] if the new session vanished before it
/// could be read back.
#[utoipa::path(
    post,
    path = "/api/v1/sessions",
    tag = "Sessions",
    summary = "Open a form session",
    description = "Creates a session holding the form values with their defaults: the first event of each block, today's date, role Principal, zero counts and empty athlete lists.",
    responses(
        (status = 201, description = "Session opened", body = CreateSessionResponse),
    )
)]
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, SurveyError> {
    let session_id = state.survey_service.create_session().await;
    let session = state
        .survey_service
        .session(session_id)
        .await
        .map_err(|err| SurveyError::Internal(err.to_string()))?;

    let response = CreateSessionResponse {
        session_id,
        session: SessionResponse::from(&session),
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /sessions/:id` — Current values of a session.
///
/// # Errors
///
/// Returns [`SurveyError::SessionNotFound`] if the session is not open.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    summary = "Get session state",
    description = "Returns the coach details and every block's values and athlete list.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 200, description = "Session state", body = SessionResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn get_session(
    State(state): State<AppState>,
    path: Result<Path<uuid::Uuid>, PathRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let Path(id) = path?;
    let session = state
        .survey_service
        .session(SessionId::from_uuid(id))
        .await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// `DELETE /sessions/:id` — Discard a session.
///
/// # Errors
///
/// Returns [`SurveyError::SessionNotFound`] if the session is not open.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}",
    tag = "Sessions",
    summary = "Discard a session",
    description = "Drops the session and everything entered into it. Nothing is written to the spreadsheet.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    responses(
        (status = 204, description = "Session discarded"),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn delete_session(
    State(state): State<AppState>,
    path: Result<Path<uuid::Uuid>, PathRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let Path(id) = path?;
    state
        .survey_service
        .close_session(SessionId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /sessions/:id/personal` — Update the coach details.
///
/// # Errors
///
/// Returns [`SurveyError::SessionNotFound`] if the session is not open, or
/// [`SurveyError::InvalidRequest`] on a malformed body.
#[utoipa::path(
    patch,
    path = "/api/v1/sessions/{id}/personal",
    tag = "Sessions",
    summary = "Update coach details",
    description = "Sets any of coach name, league and identity document. Omitted fields keep their value. The details are shared by every block of the session.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
    ),
    request_body = PersonalInfoPatch,
    responses(
        (status = 200, description = "Updated session state", body = SessionResponse),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn update_personal(
    State(state): State<AppState>,
    path: Result<Path<uuid::Uuid>, PathRejection>,
    body: Result<Json<PersonalInfoPatch>, JsonRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let Path(id) = path?;
    let Json(patch) = body?;
    let session = state
        .survey_service
        .update_personal(SessionId::from_uuid(id), patch)
        .await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// Session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/{id}", get(get_session).delete(delete_session))
        .route("/sessions/{id}/personal", patch(update_personal))
}
