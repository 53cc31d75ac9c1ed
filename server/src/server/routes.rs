//! HTTP route handlers binding the session operations to endpoints

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use std::sync::Arc;

use crate::capabilities::Capabilities;
use crate::protocol::{CreateSessionRequest, CreateSessionResponse};
use crate::session::{SessionController, SessionEntry, SessionError};

/// Application state shared by the session handlers
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SessionController>,
}

impl AppState {
    pub fn new(controller: Arc<SessionController>) -> Self {
        Self { controller }
    }
}

/// Error response for the session API
#[derive(Debug, Serialize)]
pub struct SessionErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<SessionError> for SessionErrorResponse {
    fn from(e: SessionError) -> Self {
        let code = match &e {
            SessionError::AlreadyActive => "session_already_active",
            SessionError::InvalidCapabilities(_) => "invalid_capabilities",
        };
        Self {
            error: e.to_string(),
            code: code.to_string(),
        }
    }
}

impl IntoResponse for SessionErrorResponse {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "session_already_active" => StatusCode::CONFLICT,
            "invalid_capabilities" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Build the session API router
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/session",
            post(create_session).get(get_session).delete(delete_session),
        )
        .route("/sessions", get(get_sessions))
}

/// POST /session - create the session
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, SessionErrorResponse> {
    let (session_id, capabilities) = state
        .controller
        .create_session(request.capabilities)
        .await
        .map_err(|e| {
            tracing::warn!("Session creation rejected: {}", e);
            SessionErrorResponse::from(e)
        })?;

    // First arm of the inactivity timer, if the session configured one
    state.controller.reset_inactivity_timer().await;

    Ok(Json(CreateSessionResponse {
        session_id,
        capabilities,
    }))
}

/// GET /sessions - list active sessions (empty or one entry)
async fn get_sessions(State(state): State<AppState>) -> Json<Vec<SessionEntry>> {
    let sessions = state.controller.get_sessions().await;
    state.controller.reset_inactivity_timer().await;
    Json(sessions)
}

/// GET /session - capabilities of the active session, 404 when idle
async fn get_session(State(state): State<AppState>) -> Result<Json<Capabilities>, Response> {
    let caps = state.controller.get_session().await;
    state.controller.reset_inactivity_timer().await;

    match caps {
        Some(caps) => Ok(Json(caps)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(SessionErrorResponse {
                error: "No active session".to_string(),
                code: "no_active_session".to_string(),
            }),
        )
            .into_response()),
    }
}

/// DELETE /session - tear down the session; a no-op when idle
async fn delete_session(State(state): State<AppState>) -> StatusCode {
    state.controller.delete_session().await;
    StatusCode::NO_CONTENT
}
