//! MCP relay server.

use anyhow::Context;
use clap::Parser;
use std::future::IntoFuture;
use std::net::{Ipv4Addr, SocketAddr};
use tracing::info;

use mcp_relay::{config::Config, create_app_with_state, logging, mcp::SessionStore, state::AppState};

/// MCP relay - local session and Server-Sent-Events relay
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on (loopback only)
    #[arg(short, long, env = "MCP_RELAY_PORT")]
    port: Option<u16>,

    /// Seconds between keep-alive pings on open streams
    #[arg(long, env = "MCP_RELAY_KEEP_ALIVE_SECS")]
    keep_alive_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = Config::from_figment(args.port, args.keep_alive_secs)
        .context("Failed to load configuration")?;
    let _log_guard = logging::init(&config)?;
    info!("Configuration loaded");

    let state = AppState::new(SessionStore::new(), config.keep_alive());
    let app = create_app_with_state(state);

    // Loopback only: the relay allows any CORS origin.
    let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("MCP relay listening on http://{}", addr);

    // Open streams never finish on their own, so stop on Ctrl+C instead of
    // waiting for connections to drain.
    tokio::select! {
        result = axum::serve(listener, app).into_future() => result?,
        _ = shutdown_signal() => info!("Received Ctrl+C, shutting down"),
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
}
