//! MCP session management.
//!
//! The [`SessionStore`] owns every session created through `initialize`
//! together with the event streams attached to it. Sessions are identified by
//! random UUIDs and live for the lifetime of the store.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use relay_types::SessionInfo;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Opaque session identifier.
pub type SessionId = String;

/// Events a stream may hold unread before new ones are dropped for it.
pub const STREAM_BUFFER: usize = 100;

/// Identity of one attached stream, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamId(u64);

impl std::fmt::Display for StreamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stream-{}", self.0)
    }
}

/// A named event ready to be written to a stream.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayEvent {
    /// Event name (`event:` field). Never contains line breaks.
    pub name: String,
    /// Rendered payload (`data:` field). Never contains carriage returns.
    pub data: String,
}

impl RelayEvent {
    /// Create an event, normalizing line breaks that SSE framing cannot carry.
    pub fn new(name: &str, data: impl Into<String>) -> Self {
        let data: String = data.into();
        Self {
            name: name.replace(['\r', '\n'], " "),
            data: data.replace("\r\n", "\n").replace('\r', "\n"),
        }
    }

    /// The synthetic first event of every stream.
    pub fn connected(session_id: &str) -> Self {
        Self::new(
            "connected",
            serde_json::json!({ "sessionId": session_id }).to_string(),
        )
    }
}

/// Write side of an attached stream.
#[derive(Debug)]
pub(crate) struct StreamHandle {
    pub(crate) id: StreamId,
    pub(crate) tx: mpsc::Sender<RelayEvent>,
}

/// An MCP session.
#[derive(Debug)]
struct McpSession {
    id: SessionId,
    client_info: Value,
    created_at: DateTime<Utc>,
    streams: Vec<StreamHandle>,
}

impl McpSession {
    fn new(client_info: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            client_info,
            created_at: Utc::now(),
            streams: Vec::new(),
        }
    }

    fn info(&self) -> SessionInfo {
        SessionInfo {
            session_id: self.id.clone(),
            client_info: self.client_info.clone(),
            created_at: self.created_at,
            streams: self.streams.len(),
        }
    }
}

#[derive(Default)]
struct StoreInner {
    sessions: RwLock<HashMap<SessionId, McpSession>>,
    next_stream_id: AtomicU64,
}

/// Store of MCP sessions.
///
/// Cloning is cheap and every clone refers to the same sessions. Each store
/// is independent, so tests can create as many as they need.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<StoreInner>,
}

impl SessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new session and return its ID.
    pub fn create_session(&self, client_info: Value) -> SessionId {
        let session = McpSession::new(client_info);
        let id = session.id.clone();
        self.inner.sessions.write().insert(id.clone(), session);
        info!("Created MCP session: {}", id);
        id
    }

    /// Check if a session exists.
    pub fn exists(&self, id: &str) -> bool {
        self.inner.sessions.read().contains_key(id)
    }

    /// Get a snapshot of a session by ID.
    pub fn get(&self, id: &str) -> Option<SessionInfo> {
        self.inner.sessions.read().get(id).map(McpSession::info)
    }

    /// Snapshot of every session, oldest first.
    pub fn list(&self) -> Vec<SessionInfo> {
        let mut sessions: Vec<SessionInfo> = self
            .inner
            .sessions
            .read()
            .values()
            .map(McpSession::info)
            .collect();
        sessions.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        sessions
    }

    /// Get the number of sessions.
    pub fn session_count(&self) -> usize {
        self.inner.sessions.read().len()
    }

    /// Number of open streams for a session, or `None` if it is unknown.
    pub fn stream_count(&self, id: &str) -> Option<usize> {
        self.inner.sessions.read().get(id).map(|s| s.streams.len())
    }

    /// Attach a stream to a session. Returns `None` if the session is unknown.
    pub(crate) fn attach(
        &self,
        id: &str,
        tx: mpsc::Sender<RelayEvent>,
    ) -> Option<StreamId> {
        let mut sessions = self.inner.sessions.write();
        let session = sessions.get_mut(id)?;
        let stream_id = StreamId(self.inner.next_stream_id.fetch_add(1, Ordering::Relaxed));
        session.streams.push(StreamHandle { id: stream_id, tx });
        debug!(
            "Attached {} to session {} ({} open)",
            stream_id,
            id,
            session.streams.len()
        );
        Some(stream_id)
    }

    /// Remove a stream from a session by identity.
    pub(crate) fn detach(&self, id: &str, stream_id: StreamId) -> bool {
        let mut sessions = self.inner.sessions.write();
        let Some(session) = sessions.get_mut(id) else {
            return false;
        };
        let before = session.streams.len();
        session.streams.retain(|s| s.id != stream_id);
        let removed = session.streams.len() != before;
        if removed {
            debug!(
                "Detached {} from session {} ({} open)",
                stream_id,
                id,
                session.streams.len()
            );
        }
        removed
    }

    /// Run `f` over the streams of one session while holding the read lock.
    ///
    /// Returns `None` if the session is unknown.
    pub(crate) fn with_streams<R>(
        &self,
        id: &str,
        f: impl FnOnce(&[StreamHandle]) -> R,
    ) -> Option<R> {
        let sessions = self.inner.sessions.read();
        sessions.get(id).map(|s| f(&s.streams))
    }

    /// Run `f` over every session's streams while holding the read lock.
    pub(crate) fn for_each_session(&self, mut f: impl FnMut(&str, &[StreamHandle])) {
        let sessions = self.inner.sessions.read();
        for session in sessions.values() {
            f(&session.id, &session.streams);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn test_create_session_is_unique_and_exists() {
        let store = SessionStore::new();
        let mut seen = HashSet::new();
        for _ in 0..100 {
            let id = store.create_session(json!({}));
            assert!(store.exists(&id));
            assert!(seen.insert(id));
        }
        assert_eq!(store.session_count(), 100);
    }

    #[test]
    fn test_unknown_session() {
        let store = SessionStore::new();
        assert!(!store.exists("nope"));
        assert!(store.get("nope").is_none());
        assert!(store.stream_count("nope").is_none());
    }

    #[test]
    fn test_get_returns_client_info() {
        let store = SessionStore::new();
        let id = store.create_session(json!({"name": "figma-plugin", "version": "1.0"}));
        let info = store.get(&id).unwrap();
        assert_eq!(info.session_id, id);
        assert_eq!(info.client_info["name"], "figma-plugin");
        assert_eq!(info.streams, 0);
    }

    #[test]
    fn test_stores_are_independent() {
        let a = SessionStore::new();
        let b = SessionStore::new();
        let id = a.create_session(json!({}));
        assert!(a.exists(&id));
        assert!(!b.exists(&id));
    }

    #[test]
    fn test_attach_and_detach_by_identity() {
        let store = SessionStore::new();
        let id = store.create_session(json!({}));
        let (tx1, _rx1) = mpsc::channel(STREAM_BUFFER);
        let (tx2, _rx2) = mpsc::channel(STREAM_BUFFER);

        let first = store.attach(&id, tx1).unwrap();
        let second = store.attach(&id, tx2).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.stream_count(&id), Some(2));

        assert!(store.detach(&id, first));
        assert!(!store.detach(&id, first));
        assert_eq!(store.stream_count(&id), Some(1));
        let remaining = store.with_streams(&id, |s| s[0].id).unwrap();
        assert_eq!(remaining, second);
    }

    #[test]
    fn test_attach_unknown_session() {
        let store = SessionStore::new();
        let (tx, _rx) = mpsc::channel(STREAM_BUFFER);
        assert!(store.attach("nope", tx).is_none());
    }

    #[test]
    fn test_list_is_oldest_first() {
        let store = SessionStore::new();
        let first = store.create_session(json!({"n": 1}));
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = store.create_session(json!({"n": 2}));
        let listed: Vec<String> = store.list().into_iter().map(|s| s.session_id).collect();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn test_event_normalizes_line_breaks() {
        let event = RelayEvent::new("bad\r\nname", "a\r\nb\rc");
        assert_eq!(event.name, "bad  name");
        assert_eq!(event.data, "a\nb\nc");
    }
}
