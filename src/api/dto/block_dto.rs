//! Block action DTOs: athlete roster edits and submissions.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{EventBlock, ResultRecord, RosterOutcome};
use crate::store::AppendReceipt;

/// Request body for `POST /sessions/{id}/blocks/{block}/athletes`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddAthleteRequest {
    /// Athlete name as typed; surrounding whitespace is trimmed.
    #[serde(default)]
    pub name: String,
}

/// Response body for an add-athlete action.
///
/// Always `200 OK`; a blank name comes back with `status = "rejected"`.
#[derive(Debug, Serialize, ToSchema)]
pub struct AthleteListResponse {
    /// Block the roster belongs to.
    pub block: EventBlock,
    /// What happened to the offered name.
    pub outcome: RosterOutcome,
    /// Roster after the action.
    pub athletes: Vec<String>,
}

/// Response body for `DELETE /sessions/{id}/blocks/{block}/athletes`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterClearedResponse {
    /// Block whose roster was emptied.
    pub block: EventBlock,
    /// Confirmation shown to the user.
    pub message: String,
}

/// Response body for `POST /sessions/{id}/blocks/{block}/submit`.
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitResponse {
    /// Block that was submitted.
    pub block: EventBlock,
    /// Confirmation shown to the user.
    pub message: String,
    /// The row as appended.
    pub record: ResultRecord,
    /// Sheet state after the append.
    pub receipt: AppendReceipt,
}
