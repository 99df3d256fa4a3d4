//! Push named events into session streams.

use serde_json::Value;
use tokio::sync::mpsc::error::TrySendError;
use tracing::debug;

use super::session::{RelayEvent, SessionStore, StreamHandle};

/// Render a payload for the `data:` field.
///
/// Strings are sent verbatim, anything else as compact JSON.
pub fn render_payload(payload: &Value) -> String {
    match payload {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Write `event` to every stream without waiting.
///
/// A stream whose buffer is full misses the event. A closed stream is
/// skipped; its own disconnect path removes it.
fn write_all(session_id: &str, streams: &[StreamHandle], event: &RelayEvent) {
    for stream in streams {
        match stream.tx.try_send(event.clone()) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!(
                "Dropped '{}' for lagging {} in session {}",
                event.name, stream.id, session_id
            ),
            Err(TrySendError::Closed(_)) => debug!(
                "Dropped '{}' for closed {} in session {}",
                event.name, stream.id, session_id
            ),
        }
    }
}

/// Best-effort event delivery to one or all sessions.
#[derive(Clone)]
pub struct EventDispatcher {
    sessions: SessionStore,
}

impl EventDispatcher {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Send an event to every open stream of one session.
    ///
    /// Returns `false` if the session is unknown or has no open streams.
    pub fn send_to_session(&self, session_id: &str, event: &str, payload: &Value) -> bool {
        let event = RelayEvent::new(event, render_payload(payload));
        let delivered = self
            .sessions
            .with_streams(session_id, |streams| {
                if streams.is_empty() {
                    return false;
                }
                write_all(session_id, streams, &event);
                true
            })
            .unwrap_or(false);

        debug!(
            "Dispatched '{}' to session {} (delivered: {})",
            event.name, session_id, delivered
        );
        delivered
    }

    /// Send an event to every session.
    ///
    /// Returns the number of sessions that had at least one open stream.
    pub fn broadcast(&self, event: &str, payload: &Value) -> usize {
        let event = RelayEvent::new(event, render_payload(payload));
        let mut reached = 0;
        self.sessions.for_each_session(|session_id, streams| {
            if !streams.is_empty() {
                write_all(session_id, streams, &event);
                reached += 1;
            }
        });

        debug!("Broadcast '{}' reached {} sessions", event.name, reached);
        reached
    }
}
