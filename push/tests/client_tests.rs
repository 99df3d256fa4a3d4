//! Drives a live relay over TCP with the push client.

use mcp_relay::{create_app_with_state, mcp::SessionStore, state::AppState};
use mcp_relay_push::RelayClient;
use serde_json::json;
use std::time::Duration;

/// Start a relay on an ephemeral loopback port.
async fn spawn_relay() -> (AppState, RelayClient) {
    let state = AppState::new(SessionStore::new(), Duration::from_secs(60));
    let app = create_app_with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, RelayClient::new(format!("http://{}", addr)))
}

#[tokio::test]
async fn test_send_to_open_stream() {
    let (state, client) = spawn_relay().await;
    let sid = state.sessions().create_session(json!({"name": "push-test"}));
    let mut subscription = state.streams().open_stream(&sid).unwrap();
    assert_eq!(subscription.recv().await.unwrap().name, "connected");

    let response = client
        .send(&sid, Some("ping".to_string()), Some(json!({"n": 1})))
        .await
        .unwrap();
    assert!(response.ok);

    let event = tokio::time::timeout(Duration::from_secs(2), subscription.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(event.name, "ping");
    assert_eq!(event.data, r#"{"n":1}"#);
}

#[tokio::test]
async fn test_send_unknown_session_is_error() {
    let (_, client) = spawn_relay().await;
    let err = client.send("bogus", None, None).await.unwrap_err();
    assert!(err.to_string().contains("Unknown sessionId"), "{}", err);
}

#[tokio::test]
async fn test_broadcast_and_sessions() {
    let (state, client) = spawn_relay().await;
    let a = state.sessions().create_session(json!({}));
    let _b = state.sessions().create_session(json!({}));
    let _stream = state.streams().open_stream(&a).unwrap();

    let response = client.broadcast(None, Some(json!("hi"))).await.unwrap();
    assert!(response.ok);
    assert_eq!(response.sessions_notified, 1);

    let sessions = client.sessions().await.unwrap();
    assert_eq!(sessions.len(), 2);
    let open: usize = sessions.iter().map(|s| s.streams).sum();
    assert_eq!(open, 1);
}
