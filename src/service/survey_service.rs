//! Survey service: every user action on a form session goes through here.

use std::sync::Arc;

use chrono::Local;

use crate::domain::{
    BlockFormPatch, EventBlock, FormSession, PersonalInfoPatch, ResultRecord, RosterOutcome,
    SessionId, SessionRegistry, normalize,
};
use crate::error::SurveyError;
use crate::store::{AppendReceipt, StoreAdapter};

/// Outcome of a successful block submission.
#[derive(Debug, Clone)]
pub struct Submission {
    /// The record that was appended.
    pub record: ResultRecord,
    /// What the append left in the sheet.
    pub receipt: AppendReceipt,
}

/// Orchestration layer over the session registry and the store adapter.
///
/// Each action locks only the session it touches. A submit holds that lock
/// across the remote append, so actions within one session never interleave
/// with its own submission.
#[derive(Debug, Clone)]
pub struct SurveyService {
    registry: Arc<SessionRegistry>,
    store: StoreAdapter,
}

impl SurveyService {
    /// Creates a new `SurveyService`.
    #[must_use]
    pub fn new(registry: Arc<SessionRegistry>, store: StoreAdapter) -> Self {
        Self { registry, store }
    }

    /// Returns a reference to the inner [`SessionRegistry`].
    #[must_use]
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Opens a form session with default values dated today.
    pub async fn create_session(&self) -> SessionId {
        let session_id = self.registry.create(Local::now().date_naive()).await;
        tracing::info!(%session_id, "form session opened");
        session_id
    }

    /// Returns a copy of the session's current values.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open.
    pub async fn session(&self, session_id: SessionId) -> Result<FormSession, SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let session = lock.read().await;
        Ok(session.clone())
    }

    /// Discards a session and everything entered into it.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open.
    pub async fn close_session(&self, session_id: SessionId) -> Result<(), SurveyError> {
        self.registry.remove(session_id).await?;
        tracing::info!(%session_id, "form session closed");
        Ok(())
    }

    /// Updates the coach details shared by all blocks.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open.
    pub async fn update_personal(
        &self,
        session_id: SessionId,
        patch: PersonalInfoPatch,
    ) -> Result<FormSession, SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let mut session = lock.write().await;
        session.personal.apply(patch);
        session.touch();
        Ok(session.clone())
    }

    /// Updates the widget values of one block.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open,
    /// or [`SurveyError::EventNotInBlock`] if the patch selects an event
    /// from another block.
    pub async fn update_block(
        &self,
        session_id: SessionId,
        block: EventBlock,
        patch: BlockFormPatch,
    ) -> Result<FormSession, SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let mut session = lock.write().await;
        session.block_mut(block).form.apply(block, patch)?;
        session.touch();
        Ok(session.clone())
    }

    /// Offers an athlete name to the block's roster.
    ///
    /// A blank name is reported through [`RosterOutcome::Rejected`], not as
    /// an error.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open.
    pub async fn add_athlete(
        &self,
        session_id: SessionId,
        block: EventBlock,
        name: &str,
    ) -> Result<(RosterOutcome, Vec<String>), SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let mut session = lock.write().await;
        let outcome = session.block_mut(block).roster.add(name);

        match &outcome {
            RosterOutcome::Added { position, .. } => {
                session.touch();
                tracing::debug!(%session_id, %block, position, "athlete added");
            }
            RosterOutcome::Rejected { .. } => {
                tracing::debug!(%session_id, %block, "blank athlete name rejected");
            }
        }
        Ok((outcome, session.block(block).roster.list().to_vec()))
    }

    /// Empties the block's roster.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open.
    pub async fn clear_athletes(
        &self,
        session_id: SessionId,
        block: EventBlock,
    ) -> Result<(), SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let mut session = lock.write().await;
        session.block_mut(block).roster.clear();
        session.touch();
        tracing::debug!(%session_id, %block, "athlete list cleared");
        Ok(())
    }

    /// Normalizes the block into a record stamped with the current local
    /// time and appends it to the spreadsheet. The block's roster is cleared
    /// only once the append succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if the session is not open,
    /// or [`SurveyError::Store`] if any remote step fails. Session state is
    /// left untouched on failure.
    pub async fn submit(
        &self,
        session_id: SessionId,
        block: EventBlock,
    ) -> Result<Submission, SurveyError> {
        let lock = self.registry.get(session_id).await?;
        let mut session = lock.write().await;

        let state = session.block(block);
        let record = normalize(
            &session.personal,
            &state.form,
            state.roster.list(),
            Local::now().naive_local(),
        );

        let receipt = match self.store.append(&record).await {
            Ok(receipt) => receipt,
            Err(err) => {
                tracing::error!(%session_id, %block, error = %err, "submission failed");
                return Err(err.into());
            }
        };

        session.block_mut(block).roster.clear();
        session.touch();
        tracing::info!(
            %session_id,
            %block,
            event = %record.event,
            total_rows = receipt.total_rows,
            "block submitted"
        );
        Ok(Submission { record, receipt })
    }
}
