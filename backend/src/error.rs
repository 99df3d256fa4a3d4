//! Relay error type.

use axum::http::StatusCode;
use relay_types::jsonrpc::codes;
use relay_types::JsonRpcResponse;
use serde_json::Value;
use thiserror::Error;

/// Errors raised while handling one-shot requests or opening streams.
///
/// Event delivery never produces one of these; it reports non-delivery
/// through return values instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("Missing session id")]
    MissingSessionId,
    #[error("Invalid session id")]
    InvalidSession(String),
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl RelayError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            RelayError::MissingSessionId => codes::MISSING_SESSION,
            RelayError::InvalidSession(_) => codes::INVALID_SESSION,
            RelayError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            RelayError::Parse(_) => codes::PARSE_ERROR,
        }
    }

    /// HTTP status used when the error crosses the HTTP boundary.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// Render as a JSON-RPC error envelope echoing `id`.
    pub fn to_response(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::error(id, self.code(), self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_errors_are_distinct() {
        let missing = RelayError::MissingSessionId;
        let invalid = RelayError::InvalidSession("abc".to_string());
        assert_eq!(missing.code(), -32600);
        assert_eq!(invalid.code(), -32001);
        assert_ne!(missing.to_string(), invalid.to_string());
    }

    #[test]
    fn test_method_not_found_envelope() {
        let response = RelayError::MethodNotFound("foo/bar".to_string()).to_response(Some(json!(3)));
        let error = response.error.unwrap();
        assert_eq!(response.id, json!(3));
        assert_eq!(error.code, -32601);
        assert_eq!(error.message, "Method not found: foo/bar");
    }
}
