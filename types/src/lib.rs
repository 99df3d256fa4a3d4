//! Shared types for the MCP event relay.
//!
//! This crate contains the JSON-RPC envelopes and HTTP API bodies shared
//! between the relay server and its push client.

/// Default port for the relay server.
pub const DEFAULT_PORT: u16 = 3845;

/// Header carrying the MCP session identifier.
pub const SESSION_ID_HEADER: &str = "mcp-session-id";

pub mod api;
pub mod jsonrpc;

// Re-export commonly used types
pub use api::{
    empty_payload, BroadcastRequest, BroadcastResponse, ErrorResponse, SendRequest, SendResponse,
    SessionInfo, DEFAULT_EVENT_NAME,
};
pub use jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION};
