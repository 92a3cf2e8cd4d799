//! Shared application state injected into all Axum handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::service::SurveyService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Survey service for all business logic.
    pub survey_service: Arc<SurveyService>,
    /// Branding image served at `/logo`.
    pub logo_path: Arc<PathBuf>,
}

impl AppState {
    /// Whether the branding image currently exists on disk.
    pub async fn logo_available(&self) -> bool {
        tokio::fs::try_exists(self.logo_path.as_path())
            .await
            .unwrap_or(false)
    }
}
