//! Concurrent storage of live form sessions with per-session locking.
//!
//! [`SessionRegistry`] keeps every open session in a `HashMap` where each
//! entry sits behind its own [`tokio::sync::RwLock`]. Actions on one session
//! are serialized while different sessions proceed independently.
//!
//! Sessions left idle longer than the configured TTL are dropped: lazily when
//! looked up, and in bulk by [`SessionRegistry::purge_idle`], which also runs
//! on every [`SessionRegistry::create`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use tokio::sync::RwLock;

use super::{FormSession, SessionId};
use crate::error::SurveyError;

/// Central store for all open form sessions.
///
/// Sessions are transient: nothing here survives a restart.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<SessionId, Arc<RwLock<FormSession>>>>,
    idle_ttl: Option<TimeDelta>,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions never expire.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: None,
        }
    }

    /// Creates an empty registry that drops sessions unmodified for longer
    /// than `idle_ttl`. A zero TTL disables expiry.
    #[must_use]
    pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: TimeDelta::from_std(idle_ttl)
                .ok()
                .filter(|ttl| !ttl.is_zero()),
        }
    }

    /// A session is idle once its last change is older than the TTL. One
    /// whose lock is held is in use and never idle.
    fn is_idle(&self, session: &RwLock<FormSession>, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.idle_ttl else {
            return false;
        };
        session
            .try_read()
            .is_ok_and(|s| now.signed_duration_since(s.last_modified_at) > ttl)
    }

    /// Drops every idle session and returns how many were dropped.
    pub async fn purge_idle(&self) -> usize {
        if self.idle_ttl.is_none() {
            return 0;
        }
        let now = Utc::now();
        let mut map = self.sessions.write().await;
        let before = map.len();
        map.retain(|_, session| !self.is_idle(session, now));
        let purged = before - map.len();
        if purged > 0 {
            tracing::info!(purged, open = map.len(), "idle form sessions expired");
        }
        purged
    }

    /// Opens a new session with default values dated `today`.
    pub async fn create(&self, today: NaiveDate) -> SessionId {
        self.purge_idle().await;
        let session_id = SessionId::new();
        let session = FormSession::new(session_id, today);
        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(RwLock::new(session)));
        session_id
    }

    /// Returns the session behind its per-session lock.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if no session with the given
    /// ID is open or it has been idle past the TTL.
    pub async fn get(
        &self,
        session_id: SessionId,
    ) -> Result<Arc<RwLock<FormSession>>, SurveyError> {
        let session = self
            .sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| not_found(session_id))?;

        if self.is_idle(&session, Utc::now()) {
            self.sessions.write().await.remove(&session_id);
            tracing::debug!(%session_id, "idle form session expired");
            return Err(not_found(session_id));
        }
        Ok(session)
    }

    /// Discards a session.
    ///
    /// # Errors
    ///
    /// Returns [`SurveyError::SessionNotFound`] if no session with the given
    /// ID is open.
    pub async fn remove(&self, session_id: SessionId) -> Result<(), SurveyError> {
        self.sessions
            .write()
            .await
            .remove(&session_id)
            .map(|_| ())
            .ok_or_else(|| not_found(session_id))
    }

    /// Returns the number of open sessions.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Returns `true` if no session is open.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn not_found(session_id: SessionId) -> SurveyError {
    SurveyError::SessionNotFound(*session_id.as_uuid())
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
