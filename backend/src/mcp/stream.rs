//! Long-lived event streams bound to a session.

use futures::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::session::{RelayEvent, SessionId, SessionStore, StreamId, STREAM_BUFFER};
use crate::error::RelayError;

/// Accepts streams for existing sessions and keeps them registered.
#[derive(Clone)]
pub struct StreamManager {
    sessions: SessionStore,
}

impl StreamManager {
    pub fn new(sessions: SessionStore) -> Self {
        Self { sessions }
    }

    /// Open a stream for `session_id`.
    ///
    /// The returned subscription yields `connected` first, then every event
    /// dispatched to the session after registration. Dropping it detaches the
    /// stream from the session.
    pub fn open_stream(&self, session_id: &str) -> Result<StreamSubscription, RelayError> {
        if !self.sessions.exists(session_id) {
            warn!("Rejecting stream for unknown session {}", session_id);
            return Err(RelayError::InvalidSession(session_id.to_string()));
        }

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        // Queued before registration so it precedes any dispatched event.
        let _ = tx.try_send(RelayEvent::connected(session_id));

        let stream_id = self
            .sessions
            .attach(session_id, tx)
            .ok_or_else(|| RelayError::InvalidSession(session_id.to_string()))?;

        info!("Stream {} opened for session {}", stream_id, session_id);

        Ok(StreamSubscription {
            rx,
            registration: Registration {
                sessions: self.sessions.clone(),
                session_id: session_id.to_string(),
                stream_id,
            },
        })
    }
}

/// Removes the stream from its session when dropped.
struct Registration {
    sessions: SessionStore,
    session_id: SessionId,
    stream_id: StreamId,
}

impl Drop for Registration {
    fn drop(&mut self) {
        if self.sessions.detach(&self.session_id, self.stream_id) {
            info!(
                "Stream {} closed for session {}",
                self.stream_id, self.session_id
            );
        }
    }
}

/// Receiving end of an attached stream.
pub struct StreamSubscription {
    rx: mpsc::Receiver<RelayEvent>,
    registration: Registration,
}

impl StreamSubscription {
    pub fn session_id(&self) -> &str {
        &self.registration.session_id
    }

    pub fn stream_id(&self) -> StreamId {
        self.registration.stream_id
    }

    /// Wait for the next event.
    pub async fn recv(&mut self) -> Option<RelayEvent> {
        self.rx.recv().await
    }

    /// Take an event if one is already queued.
    pub fn try_recv(&mut self) -> Option<RelayEvent> {
        self.rx.try_recv().ok()
    }
}

impl Stream for StreamSubscription {
    type Item = RelayEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}
