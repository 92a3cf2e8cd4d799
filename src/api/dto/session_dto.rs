//! Session DTOs: snapshots of a form session and its blocks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BlockForm, EventBlock, FormSession, PersonalInfo, SessionId};

/// Response body for `POST /sessions` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateSessionResponse {
    /// Identifier to use in every subsequent session request.
    pub session_id: SessionId,
    /// Full state of the new session, defaults applied.
    pub session: SessionResponse,
}

/// Current values of one event block.
#[derive(Debug, Serialize, ToSchema)]
pub struct BlockStateDto {
    /// Block slug.
    pub block: EventBlock,
    /// Block heading.
    pub title: &'static str,
    /// Widget values.
    pub form: BlockForm,
    /// Athletes added since the last clear or submit, in order.
    pub athletes: Vec<String>,
}

/// Full session state returned by the session endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Session identifier.
    pub session_id: SessionId,
    /// Coach details.
    pub personal: PersonalInfo,
    /// Every event block, in form order.
    pub blocks: Vec<BlockStateDto>,
    /// When the session was opened.
    pub created_at: DateTime<Utc>,
    /// Last time any value changed.
    pub updated_at: DateTime<Utc>,
}

impl From<&FormSession> for SessionResponse {
    fn from(session: &FormSession) -> Self {
        let blocks = EventBlock::ALL
            .into_iter()
            .map(|block| {
                let state = session.block(block);
                BlockStateDto {
                    block,
                    title: block.title(),
                    form: state.form.clone(),
                    athletes: state.roster.list().to_vec(),
                }
            })
            .collect();

        Self {
            session_id: session.session_id,
            personal: session.personal.clone(),
            blocks,
            created_at: session.created_at,
            updated_at: session.last_modified_at,
        }
    }
}
