//! MCP endpoint handlers.
//!
//! ## Endpoints
//!
//! - `POST /mcp` - Send JSON-RPC requests
//! - `GET /mcp` - Open SSE stream for events pushed to the session

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use relay_types::{JsonRpcRequest, JsonRpcResponse, SESSION_ID_HEADER};
use serde::Deserialize;
use serde_json::Value;
use std::convert::Infallible;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::error::RelayError;
use crate::mcp::{Handled, RelayEvent};
use crate::state::AppState;

/// Query parameters accepted by `GET /mcp`.
#[derive(Debug, Default, Deserialize)]
pub struct StreamQuery {
    /// For browser clients that cannot set headers on an `EventSource`.
    #[serde(rename = "sessionId")]
    pub session_id: Option<String>,
}

/// Extract session ID from headers.
fn get_session_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(non_blank)
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// JSON response carrying the session id header, if any.
fn json_with_session(status: StatusCode, body: JsonRpcResponse, session_id: Option<&str>) -> Response {
    let mut resp = (status, Json(body)).into_response();
    if let Some(sid) = session_id {
        if let Ok(hv) = HeaderValue::from_str(sid) {
            resp.headers_mut()
                .insert(HeaderName::from_static(SESSION_ID_HEADER), hv);
        }
    }
    resp
}

/// Render a relay error as a JSON-RPC error envelope.
fn rpc_error(id: Option<Value>, err: RelayError) -> Response {
    (err.status(), Json(err.to_response(id))).into_response()
}

fn to_sse(event: RelayEvent) -> Event {
    Event::default().event(event.name).data(event.data)
}

/// POST /mcp - Handle JSON-RPC requests.
///
/// `initialize` needs no session and returns the new id both in the result
/// and in the `mcp-session-id` header. All other methods require that header.
pub async fn mcp_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request: JsonRpcRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("MCP: Rejecting malformed request: {}", e);
            return rpc_error(None, RelayError::Parse(e.to_string()));
        }
    };

    let session_id = get_session_id(&headers);
    let id = request.id.clone();
    debug!(
        "MCP POST: method={}, session={:?}",
        request.method, session_id
    );

    match state
        .handler()
        .handle_request(session_id.as_deref(), request)
    {
        Ok(Handled::Initialized {
            session_id,
            response,
        }) => json_with_session(StatusCode::OK, response, Some(&session_id)),
        Ok(Handled::Response(response)) => {
            json_with_session(StatusCode::OK, response, session_id.as_deref())
        }
        Ok(Handled::Accepted) => StatusCode::ACCEPTED.into_response(),
        Err(e) => rpc_error(id, e),
    }
}

/// GET /mcp - Open SSE stream for a session.
///
/// The session id comes from the `mcp-session-id` header or, failing that,
/// the `sessionId` query parameter. The first frame is always `connected`.
pub async fn mcp_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<StreamQuery>,
) -> Response {
    let from_query = query.session_id.as_deref().and_then(non_blank);
    let session_id = match get_session_id(&headers).or(from_query) {
        Some(id) => id,
        None => return rpc_error(None, RelayError::MissingSessionId),
    };

    let subscription = match state.streams().open_stream(&session_id) {
        Ok(subscription) => subscription,
        Err(e) => return rpc_error(None, e),
    };

    let stream = subscription.map(|event| Ok::<_, Infallible>(to_sse(event)));

    (
        [(header::CONNECTION, HeaderValue::from_static("keep-alive"))],
        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(state.keep_alive())
                .text("ping"),
        ),
    )
        .into_response()
}
