//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Resource endpoints are mounted under `/api/v1`; health, logo and the
//! OpenAPI document live at the root.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::domain::SessionRegistry;
    use crate::service::SurveyService;
    use crate::store::{MemoryWorksheetClient, StoreAdapter, WorksheetClient};

    fn test_app() -> (Router, Arc<MemoryWorksheetClient>) {
        let client = Arc::new(MemoryWorksheetClient::with_header("results"));
        let store = StoreAdapter::new(Arc::clone(&client) as Arc<dyn WorksheetClient>, "results");
        let state = AppState {
            survey_service: Arc::new(SurveyService::new(Arc::new(SessionRegistry::new()), store)),
            logo_path: Arc::new(PathBuf::from("testdata/missing-logo.png")),
        };
        (build_router().with_state(state), client)
    }

    async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        };
        let Ok(request) = request else {
            panic!("request should build");
        };
        let Ok(response) = app.clone().oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(bytes) = to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should read");
        };
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    async fn open_session(app: &Router) -> String {
        let (status, body) = call(app, Method::POST, "/api/v1/sessions", None).await;
        assert_eq!(status, StatusCode::CREATED);
        let Some(id) = body.get("session_id").and_then(Value::as_str) else {
            panic!("session id should be returned");
        };
        id.to_string()
    }

    fn error_code(body: &Value) -> Option<u64> {
        body.get("error")
            .and_then(|e| e.get("code"))
            .and_then(Value::as_u64)
    }

    #[tokio::test]
    async fn health_reports_open_sessions() {
        let (app, _client) = test_app();
        open_session(&app).await;

        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.get("status").and_then(Value::as_str), Some("healthy"));
        assert_eq!(body.get("open_sessions").and_then(Value::as_u64), Some(1));
    }

    #[tokio::test]
    async fn form_schema_warns_about_missing_logo() {
        let (app, _client) = test_app();
        let (status, body) = call(&app, Method::GET, "/api/v1/form", None).await;
        assert_eq!(status, StatusCode::OK);

        let branding = body.get("branding");
        assert_eq!(
            branding.and_then(|b| b.get("logo_available")).and_then(Value::as_bool),
            Some(false)
        );
        assert!(branding.and_then(|b| b.get("warning")).is_some_and(Value::is_string));
        assert_eq!(
            body.get("blocks").and_then(Value::as_array).map(Vec::len),
            Some(3)
        );
    }

    #[tokio::test]
    async fn missing_logo_is_not_found() {
        let (app, _client) = test_app();
        let (status, _) = call(&app, Method::GET, "/logo", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn new_session_has_block_defaults() {
        let (app, _client) = test_app();
        let (_, body) = call(&app, Method::POST, "/api/v1/sessions", None).await;

        let Some(blocks) = body
            .get("session")
            .and_then(|s| s.get("blocks"))
            .and_then(Value::as_array)
        else {
            panic!("session blocks should be listed");
        };
        let Some(olympic) = blocks
            .iter()
            .find(|b| b.get("block").and_then(Value::as_str) == Some("olympic-cycle"))
        else {
            panic!("olympic-cycle block should be present");
        };
        let form = olympic.get("form");
        assert_eq!(
            form.and_then(|f| f.get("event")).and_then(Value::as_str),
            Some("South American Games")
        );
        assert_eq!(
            form.and_then(|f| f.get("role")).and_then(Value::as_str),
            Some("Principal")
        );
    }

    #[tokio::test]
    async fn full_block_submission_appends_row() {
        let (app, client) = test_app();
        let id = open_session(&app).await;

        let (status, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/personal"),
            Some(json!({"coach_name": "Marta Ríos", "league": "Antioquia"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/blocks/national"),
            Some(json!({"event": "National Championship", "gold": 1, "bronze": 2})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        for name in ["Ana", "Luis"] {
            let (status, body) = call(
                &app,
                Method::POST,
                &format!("/api/v1/sessions/{id}/blocks/national/athletes"),
                Some(json!({ "name": name })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(
                body.get("outcome").and_then(|o| o.get("status")).and_then(Value::as_str),
                Some("added")
            );
        }

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/blocks/national/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let record = body.get("record");
        assert_eq!(
            record.and_then(|r| r.get("athletes")).and_then(Value::as_str),
            Some("Ana, Luis")
        );
        assert_eq!(
            record.and_then(|r| r.get("event")).and_then(Value::as_str),
            Some("National Championship")
        );
        assert_eq!(
            body.get("receipt").and_then(|r| r.get("formatted_range")).and_then(Value::as_str),
            Some("A1:N2")
        );
        assert_eq!(client.rows().await.len(), 2);

        let (_, session) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        let athletes = session
            .get("blocks")
            .and_then(Value::as_array)
            .and_then(|blocks| blocks.first())
            .and_then(|b| b.get("athletes"))
            .and_then(Value::as_array)
            .map(Vec::len);
        assert_eq!(athletes, Some(0));
    }

    #[tokio::test]
    async fn blank_athlete_is_rejected_with_warning() {
        let (app, _client) = test_app();
        let id = open_session(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/blocks/championship/athletes"),
            Some(json!({"name": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let outcome = body.get("outcome");
        assert_eq!(
            outcome.and_then(|o| o.get("status")).and_then(Value::as_str),
            Some("rejected")
        );
        assert!(outcome.and_then(|o| o.get("warning")).is_some_and(Value::is_string));
        assert_eq!(
            body.get("athletes").and_then(Value::as_array).map(Vec::len),
            Some(0)
        );
    }

    #[tokio::test]
    async fn foreign_event_is_bad_request() {
        let (app, _client) = test_app();
        let id = open_session(&app).await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/blocks/national"),
            Some(json!({"event": "Olympic Games"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), Some(1003));
    }

    #[tokio::test]
    async fn unknown_block_is_bad_request() {
        let (app, _client) = test_app();
        let id = open_session(&app).await;

        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/blocks/personal/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), Some(1002));
    }

    #[tokio::test]
    async fn negative_count_is_invalid_request() {
        let (app, _client) = test_app();
        let id = open_session(&app).await;

        let (status, body) = call(
            &app,
            Method::PATCH,
            &format!("/api/v1/sessions/{id}/blocks/championship"),
            Some(json!({"gold": -1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_code(&body), Some(1001));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (app, _client) = test_app();
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());

        let (status, body) = call(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(error_code(&body), Some(2001));
    }

    #[tokio::test]
    async fn store_outage_is_bad_gateway_and_keeps_athletes() {
        let (app, client) = test_app();
        let id = open_session(&app).await;
        call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/blocks/national/athletes"),
            Some(json!({"name": "Ana"})),
        )
        .await;

        client.set_fail_appends(true);
        let (status, body) = call(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{id}/blocks/national/submit"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(error_code(&body), Some(3002));

        let (_, session) = call(&app, Method::GET, &format!("/api/v1/sessions/{id}"), None).await;
        let athletes = session
            .get("blocks")
            .and_then(Value::as_array)
            .and_then(|blocks| blocks.first())
            .and_then(|b| b.get("athletes"))
            .cloned();
        assert_eq!(athletes, Some(json!(["Ana"])));
    }

    #[tokio::test]
    async fn deleted_session_is_gone() {
        let (app, _client) = test_app();
        let id = open_session(&app).await;
        let uri = format!("/api/v1/sessions/{id}");

        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = call(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _client) = test_app();
        let (status, body) = call(&app, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.get("paths").is_some_and(Value::is_object));
    }
}
