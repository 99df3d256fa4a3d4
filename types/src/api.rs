//! API request and response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Event name used when a push request does not name one.
pub const DEFAULT_EVENT_NAME: &str = "message";

// ============================================================================
// Event push API Types
// ============================================================================

/// Payload used when a push request omits `data`.
pub fn empty_payload() -> Value {
    Value::Object(Default::default())
}

/// Request body for `POST /mcp/send`.
///
/// A missing `data` field means `{}`; an explicit `null` is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default = "empty_payload")]
    pub data: Value,
}

impl Default for SendRequest {
    fn default() -> Self {
        Self {
            session_id: None,
            event: None,
            data: empty_payload(),
        }
    }
}

impl SendRequest {
    /// Event name, falling back to [`DEFAULT_EVENT_NAME`].
    pub fn event_name(&self) -> &str {
        self.event.as_deref().unwrap_or(DEFAULT_EVENT_NAME)
    }
}

/// Response body for `POST /mcp/send`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResponse {
    pub ok: bool,
}

/// Request body for `POST /mcp/broadcast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    #[serde(default = "empty_payload")]
    pub data: Value,
}

impl Default for BroadcastRequest {
    fn default() -> Self {
        Self {
            event: None,
            data: empty_payload(),
        }
    }
}

impl BroadcastRequest {
    /// Event name, falling back to [`DEFAULT_EVENT_NAME`].
    pub fn event_name(&self) -> &str {
        self.event.as_deref().unwrap_or(DEFAULT_EVENT_NAME)
    }
}

/// Response body for `POST /mcp/broadcast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastResponse {
    pub ok: bool,
    pub sessions_notified: usize,
}

/// Error body for the push endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

// ============================================================================
// Session API Types
// ============================================================================

/// One entry of `GET /mcp/sessions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session_id: String,
    /// Free-form client description supplied on `initialize`.
    pub client_info: Value,
    pub created_at: DateTime<Utc>,
    /// Number of currently open event streams.
    pub streams: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_send_request_defaults() {
        let request: SendRequest = serde_json::from_value(json!({"sessionId": "abc"})).unwrap();
        assert_eq!(request.session_id.as_deref(), Some("abc"));
        assert_eq!(request.event_name(), "message");
        assert_eq!(request.data, json!({}));
    }

    #[test]
    fn test_explicit_null_data_is_kept() {
        let request: SendRequest =
            serde_json::from_value(json!({"sessionId": "abc", "data": null})).unwrap();
        assert_eq!(request.data, Value::Null);

        let request: BroadcastRequest = serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(request.data, Value::Null);

        let request: BroadcastRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(request.data, json!({}));
        assert_eq!(BroadcastRequest::default().data, json!({}));
    }

    #[test]
    fn test_broadcast_response_uses_camel_case() {
        let value = serde_json::to_value(BroadcastResponse {
            ok: true,
            sessions_notified: 2,
        })
        .unwrap();
        assert_eq!(value, json!({"ok": true, "sessionsNotified": 2}));
    }

    #[test]
    fn test_session_info_field_names() {
        let info = SessionInfo {
            session_id: "s".to_string(),
            client_info: json!({"name": "figma"}),
            created_at: Utc::now(),
            streams: 1,
        };
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["sessionId"], "s");
        assert_eq!(value["clientInfo"]["name"], "figma");
        assert_eq!(value["streams"], 1);
        assert!(value["createdAt"].is_string());
    }
}
