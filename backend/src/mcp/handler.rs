//! MCP JSON-RPC request handler.
//!
//! Routes one-shot requests by method name. `initialize` is the only method
//! accepted without a session; everything else must carry a known session id.

use relay_types::{JsonRpcRequest, JsonRpcResponse};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::session::{SessionId, SessionStore};
use crate::error::RelayError;

/// MCP protocol version we report.
pub const PROTOCOL_VERSION: &str = "2025-03-26";

/// Server name reported in `serverInfo`.
pub const SERVER_NAME: &str = "mcp-relay";

/// Outcome of a handled request.
#[derive(Debug, Clone, PartialEq)]
pub enum Handled {
    /// `initialize` created a new session.
    Initialized {
        session_id: SessionId,
        response: JsonRpcResponse,
    },
    /// A regular response for an existing session.
    Response(JsonRpcResponse),
    /// A notification was accepted; nothing to send back.
    Accepted,
}

/// MCP request handler.
#[derive(Clone)]
pub struct McpHandler {
    sessions: SessionStore,
}

impl McpHandler {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Handle an MCP JSON-RPC request.
    ///
    /// `session_id` is the out-of-band `mcp-session-id`, if any.
    pub fn handle_request(
        &self,
        session_id: Option<&str>,
        request: JsonRpcRequest,
    ) -> Result<Handled, RelayError> {
        let id = request.id.clone();
        debug!(
            "MCP: Handling method: {} (session: {:?})",
            request.method, session_id
        );

        if request.method == "initialize" {
            return Ok(self.handle_initialize(id, request.params));
        }

        let session_id = session_id.ok_or(RelayError::MissingSessionId)?;
        if !self.sessions.exists(session_id) {
            warn!("MCP: Unknown session id {}", session_id);
            return Err(RelayError::InvalidSession(session_id.to_string()));
        }

        match request.method.as_str() {
            "tools/list" => Ok(Handled::Response(JsonRpcResponse::success(
                id,
                json!({ "tools": [] }),
            ))),
            "prompts/list" => Ok(Handled::Response(JsonRpcResponse::success(
                id,
                json!({ "prompts": [] }),
            ))),
            "notifications/initialized" => {
                debug!("MCP: Session {} initialized", session_id);
                Ok(Handled::Accepted)
            }
            other => Err(RelayError::MethodNotFound(other.to_string())),
        }
    }

    /// Handle the initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> Handled {
        let client_info = params
            .as_ref()
            .and_then(|p| p.get("clientInfo"))
            .cloned()
            .unwrap_or_else(|| json!({}));
        let session_id = self.sessions.create_session(client_info);
        info!("MCP: New session initialized: {}", session_id);

        let response = JsonRpcResponse::success(
            id,
            json!({
                "sessionId": session_id,
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {},
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        );

        Handled::Initialized {
            session_id,
            response,
        }
    }
}
