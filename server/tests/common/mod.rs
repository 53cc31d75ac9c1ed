//! Common Test Utilities for Integration Tests
//!
//! Shared helpers used across integration test modules.

use autodriver_server::capabilities::{BasicValidator, Capabilities};
use autodriver_server::server::{AppState, session_routes};
use autodriver_server::session::SessionController;
use axum::{Json, Router, body::Body, http::Request, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Create a test application router with state
pub fn create_test_app_with_state() -> (Router, AppState) {
    create_test_app_with_defaults(Capabilities::new())
}

/// Create a test application whose validator merges the given defaults
pub fn create_test_app_with_defaults(defaults: Capabilities) -> (Router, AppState) {
    let validator = Arc::new(BasicValidator::with_defaults(defaults));
    let controller = Arc::new(SessionController::with_validator(validator));
    let app_state = AppState::new(controller);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .merge(session_routes())
        .layer(cors)
        .with_state(app_state.clone());

    (app, app_state)
}

/// Create a test application router with all routes configured
pub fn create_test_app() -> Router {
    create_test_app_with_state().0
}

/// Build a `POST /session` request carrying the given capabilities object
pub fn create_session_request(capabilities: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/session")
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::json!({"capabilities": capabilities}).to_string(),
        ))
        .unwrap()
}

/// Read a response body as JSON
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
