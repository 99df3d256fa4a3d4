//! Client for pushing events into a running MCP relay.

pub mod client;

pub use client::RelayClient;

/// Default relay URL.
pub fn default_url() -> String {
    format!("http://127.0.0.1:{}", relay_types::DEFAULT_PORT)
}
