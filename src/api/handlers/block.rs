//! Event block handlers: field updates, athlete roster, and submission.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{patch, post};
use axum::{Json, Router};

use crate::api::dto::{
    AddAthleteRequest, AthleteListResponse, RosterClearedResponse, SessionResponse,
    SubmitResponse,
};
use crate::app_state::AppState;
use crate::domain::{BlockFormPatch, EventBlock, SessionId};
use crate::error::{ErrorResponse, SurveyError};

/// Confirmation returned after a successful submit.
pub const SUBMIT_CONFIRMATION: &str = "Record saved successfully.";

/// Confirmation returned after clearing a roster.
pub const CLEAR_CONFIRMATION: &str = "Athlete list cleared.";

/// Resolves the `{id}/{block}` path pair.
fn block_path(
    path: Result<Path<(uuid::Uuid, String)>, PathRejection>,
) -> Result<(SessionId, EventBlock), SurveyError> {
    let Path((id, block)) = path?;
    Ok((SessionId::from_uuid(id), block.parse()?))
}

/// `PATCH /sessions/:id/blocks/:block` — Update a block's fields.
///
/// # Errors
///
/// Returns [`SurveyError::UnknownBlock`] for an unknown block slug,
/// [`SurveyError::EventNotInBlock`] if the event belongs to another block,
/// or [`SurveyError::SessionNotFound`] if the session is not open.
#[utoipa::path(
    patch,
    path = "/api/v1/sessions/{id}/blocks/{block}",
    tag = "Blocks",
    summary = "Update block fields",
    description = "Sets any of event, event date, venue, discipline, role and the four result counts. Omitted fields keep their value. The event must be one the block offers.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
        ("block" = EventBlock, Path, description = "Block slug"),
    ),
    request_body = BlockFormPatch,
    responses(
        (status = 200, description = "Updated session state", body = SessionResponse),
        (status = 400, description = "Unknown block, foreign event or malformed body", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn update_block(
    State(state): State<AppState>,
    path: Result<Path<(uuid::Uuid, String)>, PathRejection>,
    body: Result<Json<BlockFormPatch>, JsonRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let (session_id, block) = block_path(path)?;
    let Json(patch) = body?;
    let session = state
        .survey_service
        .update_block(session_id, block, patch)
        .await?;
    Ok(Json(SessionResponse::from(&session)))
}

/// `POST /sessions/:id/blocks/:block/athletes` — Add an athlete.
///
/// # Errors
///
/// Returns [`SurveyError::UnknownBlock`] for an unknown block slug or
/// [`SurveyError::SessionNotFound`] if the session is not open. A blank
/// name is not an error.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/blocks/{block}/athletes",
    tag = "Blocks",
    summary = "Add an athlete",
    description = "Trims the name and appends it to the block's athlete list. A blank name leaves the list unchanged and is reported with status `rejected` and a warning.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
        ("block" = EventBlock, Path, description = "Block slug"),
    ),
    request_body = AddAthleteRequest,
    responses(
        (status = 200, description = "Outcome and current athlete list", body = AthleteListResponse),
        (status = 400, description = "Unknown block or malformed body", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn add_athlete(
    State(state): State<AppState>,
    path: Result<Path<(uuid::Uuid, String)>, PathRejection>,
    body: Result<Json<AddAthleteRequest>, JsonRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let (session_id, block) = block_path(path)?;
    let Json(req) = body?;
    let (outcome, athletes) = state
        .survey_service
        .add_athlete(session_id, block, &req.name)
        .await?;
    Ok(Json(AthleteListResponse {
        block,
        outcome,
        athletes,
    }))
}

/// `DELETE /sessions/:id/blocks/:block/athletes` — Clear the athlete list.
///
/// # Errors
///
/// Returns [`SurveyError::UnknownBlock`] for an unknown block slug or
/// [`SurveyError::SessionNotFound`] if the session is not open.
#[utoipa::path(
    delete,
    path = "/api/v1/sessions/{id}/blocks/{block}/athletes",
    tag = "Blocks",
    summary = "Clear the athlete list",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
        ("block" = EventBlock, Path, description = "Block slug"),
    ),
    responses(
        (status = 200, description = "Athlete list cleared", body = RosterClearedResponse),
        (status = 400, description = "Unknown block", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
    )
)]
pub async fn clear_athletes(
    State(state): State<AppState>,
    path: Result<Path<(uuid::Uuid, String)>, PathRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let (session_id, block) = block_path(path)?;
    state
        .survey_service
        .clear_athletes(session_id, block)
        .await?;
    Ok(Json(RosterClearedResponse {
        block,
        message: CLEAR_CONFIRMATION.to_string(),
    }))
}

/// `POST /sessions/:id/blocks/:block/submit` — Save the block as a row.
///
/// # Errors
///
/// Returns [`SurveyError::UnknownBlock`] for an unknown block slug,
/// [`SurveyError::SessionNotFound`] if the session is not open, or
/// [`SurveyError::Store`] if the spreadsheet could not be written.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{id}/blocks/{block}/submit",
    tag = "Blocks",
    summary = "Submit a block",
    description = "Builds the 14-column result row from the coach details and the block's values, appends it to the spreadsheet and center-aligns the used range. On success the block's athlete list is cleared; on failure the session is left unchanged.",
    params(
        ("id" = uuid::Uuid, Path, description = "Session UUID"),
        ("block" = EventBlock, Path, description = "Block slug"),
    ),
    responses(
        (status = 200, description = "Row appended", body = SubmitResponse),
        (status = 400, description = "Unknown block", body = ErrorResponse),
        (status = 404, description = "Session not found", body = ErrorResponse),
        (status = 500, description = "Credentials missing or malformed", body = ErrorResponse),
        (status = 502, description = "Spreadsheet service failure", body = ErrorResponse),
    )
)]
pub async fn submit_block(
    State(state): State<AppState>,
    path: Result<Path<(uuid::Uuid, String)>, PathRejection>,
) -> Result<impl IntoResponse, SurveyError> {
    let (session_id, block) = block_path(path)?;
    let submission = state.survey_service.submit(session_id, block).await?;
    Ok(Json(SubmitResponse {
        block,
        message: SUBMIT_CONFIRMATION.to_string(),
        record: submission.record,
        receipt: submission.receipt,
    }))
}

/// Event block routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sessions/{id}/blocks/{block}", patch(update_block))
        .route(
            "/sessions/{id}/blocks/{block}/athletes",
            post(add_athlete).delete(clear_athletes),
        )
        .route("/sessions/{id}/blocks/{block}/submit", post(submit_block))
}
