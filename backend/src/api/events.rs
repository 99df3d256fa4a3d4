//! Out-of-band event push and session diagnostics.
//!
//! ## Endpoints
//!
//! - `POST /mcp/send` - Push one event to one session
//! - `POST /mcp/broadcast` - Push one event to every session
//! - `GET /mcp/sessions` - List sessions with their open stream counts

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use relay_types::{
    BroadcastRequest, BroadcastResponse, ErrorResponse, SendRequest, SendResponse, SessionInfo,
};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::state::AppState;

fn bad_request(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(message))).into_response()
}

/// Parse a JSON body, treating an empty body as the default value.
#[allow(clippy::result_large_err)]
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, Response> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| {
        warn!("Rejecting malformed push body: {}", e);
        bad_request(format!("Invalid JSON body: {}", e))
    })
}

/// POST /mcp/send - Push an event to one session.
///
/// Responds `{ok}` where `ok` is false when the session has no open stream.
pub async fn send_event(State(state): State<AppState>, body: Bytes) -> Response {
    let request: SendRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let session_id = match request.session_id.as_deref() {
        Some(id) if !id.is_empty() => id,
        _ => return bad_request("sessionId required"),
    };

    if !state.sessions().exists(session_id) {
        warn!("Push to unknown session {}", session_id);
        return bad_request("Unknown sessionId");
    }

    let ok = state
        .dispatcher()
        .send_to_session(session_id, request.event_name(), &request.data);
    Json(SendResponse { ok }).into_response()
}

/// POST /mcp/broadcast - Push an event to every session.
pub async fn broadcast_event(State(state): State<AppState>, body: Bytes) -> Response {
    let request: BroadcastRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(response) => return response,
    };

    let sessions_notified = state
        .dispatcher()
        .broadcast(request.event_name(), &request.data);
    info!(
        "Broadcast '{}' notified {} sessions",
        request.event_name(),
        sessions_notified
    );

    Json(BroadcastResponse {
        ok: true,
        sessions_notified,
    })
    .into_response()
}

/// GET /mcp/sessions - List all sessions.
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionInfo>> {
    Json(state.sessions().list())
}
