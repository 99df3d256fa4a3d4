//! Command-line client for pushing events into a running MCP relay.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mcp_relay_push::{default_url, RelayClient};
use serde_json::Value;
use tracing::debug;

/// Push events to MCP relay sessions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the relay
    #[arg(long, env = "MCP_RELAY_URL", default_value_t = default_url())]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Push an event to one session
    Send {
        /// Target session id
        session_id: String,
        /// Event name (defaults to "message")
        #[arg(short, long)]
        event: Option<String>,
        /// Payload as JSON; anything that is not valid JSON is sent as a string
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Push an event to every session
    Broadcast {
        /// Event name (defaults to "message")
        #[arg(short, long)]
        event: Option<String>,
        /// Payload as JSON; anything that is not valid JSON is sent as a string
        #[arg(short, long)]
        data: Option<String>,
    },
    /// List sessions and their open stream counts
    Sessions,
}

fn parse_data(data: Option<String>) -> Option<Value> {
    data.map(|raw| serde_json::from_str(&raw).unwrap_or(Value::String(raw)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = RelayClient::new(args.url);
    debug!("Using relay at {}", client.base_url());

    let output = match args.command {
        Command::Send {
            session_id,
            event,
            data,
        } => serde_json::to_value(client.send(&session_id, event, parse_data(data)).await?)?,
        Command::Broadcast { event, data } => {
            serde_json::to_value(client.broadcast(event, parse_data(data)).await?)?
        }
        Command::Sessions => serde_json::to_value(client.sessions().await?)?,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to format output")?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_data() {
        assert_eq!(parse_data(None), None);
        assert_eq!(parse_data(Some(r#"{"n":1}"#.into())), Some(json!({"n": 1})));
        assert_eq!(parse_data(Some("hello".into())), Some(json!("hello")));
    }

    #[test]
    fn test_cli_parses_send() {
        let args = Args::parse_from(["mcp-relay-push", "send", "abc", "-e", "ping", "-d", "{}"]);
        assert!(matches!(
            args.command,
            Command::Send { ref session_id, ref event, .. }
                if session_id == "abc" && event.as_deref() == Some("ping")
        ));
    }
}
