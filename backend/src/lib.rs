//! MCP relay backend library.
//!
//! This module exposes the application builder for use in tests.

use axum::body::Body;
use axum::extract::Request;
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    routing::{get, post},
    Router,
};
use relay_types::SESSION_ID_HEADER;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod mcp;
pub mod state;

use state::AppState;

/// Create the Axum application router with a fresh session store.
pub fn create_app() -> Router {
    create_app_with_state(AppState::default())
}

/// Create the Axum application router with a given state.
///
/// This function is used both by the main server binary and by integration tests.
pub fn create_app_with_state(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static(SESSION_ID_HEADER)]);

    Router::new()
        .route("/health", get(health))
        .route("/mcp", post(api::mcp::mcp_post).get(api::mcp::mcp_get))
        .route("/mcp/send", post(api::events::send_event))
        .route("/mcp/broadcast", post(api::events::broadcast_event))
        .route("/mcp/sessions", get(api::events::list_sessions))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(preflight_no_content))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}

/// Answer every `OPTIONS` request with an empty 204, keeping CORS headers.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let is_options = request.method() == Method::OPTIONS;
    let response = next.run(request).await;
    if !is_options {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.status = StatusCode::NO_CONTENT;
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);
    Response::from_parts(parts, Body::empty())
}
