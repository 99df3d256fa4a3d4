//! Application state management.

use std::sync::Arc;
use std::time::Duration;

use crate::mcp::{EventDispatcher, McpHandler, SessionStore, StreamManager};

/// Default interval between keep-alive comments on open streams.
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(25);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// All sessions and their streams
    sessions: SessionStore,
    /// JSON-RPC request routing
    handler: McpHandler,
    /// Stream registration
    streams: StreamManager,
    /// Event push to sessions
    dispatcher: EventDispatcher,
    /// Interval of `: ping` frames on open streams
    keep_alive: Duration,
}

impl AppState {
    /// Create application state around the given session store.
    pub fn new(sessions: SessionStore, keep_alive: Duration) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                handler: McpHandler::new(sessions.clone()),
                streams: StreamManager::new(sessions.clone()),
                dispatcher: EventDispatcher::new(sessions.clone()),
                sessions,
                keep_alive,
            }),
        }
    }

    /// Get the session store.
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Get the JSON-RPC request handler.
    pub fn handler(&self) -> &McpHandler {
        &self.inner.handler
    }

    /// Get the stream manager.
    pub fn streams(&self) -> &StreamManager {
        &self.inner.streams
    }

    /// Get the event dispatcher.
    pub fn dispatcher(&self) -> &EventDispatcher {
        &self.inner.dispatcher
    }

    /// Get the keep-alive interval for streams.
    pub fn keep_alive(&self) -> Duration {
        self.inner.keep_alive
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionStore::new(), DEFAULT_KEEP_ALIVE)
    }
}
