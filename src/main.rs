//! coach-results server entry point.
//!
//! Starts the Axum HTTP server with the REST endpoints.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use coach_results::api;
use coach_results::app_state::AppState;
use coach_results::config::{StoreBackend, SurveyConfig};
use coach_results::domain::SessionRegistry;
use coach_results::service::SurveyService;
use coach_results::store::{
    CredentialSource, GoogleSheetsClient, MemoryWorksheetClient, StoreAdapter, WorksheetClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = SurveyConfig::from_env()?;
    tracing::info!(
        addr = %config.listen_addr,
        spreadsheet = %config.spreadsheet_title,
        backend = ?config.store_backend,
        session_idle_ttl_secs = config.session_idle_ttl.as_secs(),
        "starting coach-results"
    );

    // Build store layer
    let client: Arc<dyn WorksheetClient> = match config.store_backend {
        StoreBackend::Sheets => {
            if std::env::var_os(&config.credentials_var).is_none() {
                tracing::warn!(
                    var = %config.credentials_var,
                    "credentials variable is not set; submissions will fail until it is"
                );
            }
            Arc::new(GoogleSheetsClient::new(
                CredentialSource::environment(config.credentials_var.clone()),
                config.endpoints.clone(),
            ))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory worksheet; rows are lost on shutdown");
            Arc::new(MemoryWorksheetClient::with_header(
                config.spreadsheet_title.clone(),
            ))
        }
    };
    let store = StoreAdapter::new(client, config.spreadsheet_title.clone());

    // Build service layer
    let registry = Arc::new(SessionRegistry::with_idle_ttl(config.session_idle_ttl));
    if !config.session_idle_ttl.is_zero() {
        let registry = Arc::clone(&registry);
        let period = config.session_idle_ttl;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                registry.purge_idle().await;
            }
        });
    }
    let survey_service = Arc::new(SurveyService::new(registry, store));

    // Build application state
    let app_state = AppState {
        survey_service,
        logo_path: Arc::new(config.logo_path.clone()),
    };
    if !app_state.logo_available().await {
        tracing::warn!(path = %config.logo_path.display(), "logo not found");
    }

    // Build router
    let app = Router::new().merge(api::build_router());

    #[cfg(feature = "swagger-ui")]
    let app = app.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json")),
    );

    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
