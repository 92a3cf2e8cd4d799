//! Handle a client keeps between form actions.
//!
//! Returned by `POST /api/v1/sessions` and echoed back in every
//! `/api/v1/sessions/{id}/...` path. It carries no user data: the coach
//! details and block values stay server-side in the
//! [`super::SessionRegistry`].

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Opaque key of one form session, a random v4 UUID on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = uuid::Uuid)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Draws a fresh random handle.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wraps the UUID parsed from a request path.
    #[must_use]
    pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
        Self(uuid)
    }

    /// The UUID reported back in `SessionNotFound` errors.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fresh_handles_are_random_v4() {
        let id = SessionId::new();
        assert_ne!(id, SessionId::new());
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn json_body_carries_bare_uuid_string() {
        let id = SessionId::new();
        let body = serde_json::json!({ "session_id": id });
        assert_eq!(
            body.get("session_id").and_then(|v| v.as_str()),
            Some(id.to_string().as_str())
        );
    }

    proptest! {
        #[test]
        fn displayed_handle_resolves_to_same_session(raw in any::<u128>()) {
            let id = SessionId::from_uuid(uuid::Uuid::from_u128(raw));
            let path = format!("/api/v1/sessions/{id}");
            let segment = path.rsplit('/').next().unwrap_or_default();
            let parsed = uuid::Uuid::parse_str(segment).map(SessionId::from_uuid);
            prop_assert_eq!(parsed.ok(), Some(id));
        }
    }
}
