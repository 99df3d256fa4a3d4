use anyhow::{bail, Context, Result};
use relay_types::{
    empty_payload, BroadcastRequest, BroadcastResponse, ErrorResponse, SendRequest, SendResponse,
    SessionInfo,
};
use reqwest::{Client, Response};
use serde_json::Value;

/// HTTP client for the relay push API
#[derive(Clone, Debug)]
pub struct RelayClient {
    base_url: String,
    client: Client,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Push an event to one session
    pub async fn send(
        &self,
        session_id: &str,
        event: Option<String>,
        data: Option<Value>,
    ) -> Result<SendResponse> {
        let url = format!("{}/mcp/send", self.base_url);
        let request = SendRequest {
            session_id: Some(session_id.to_string()),
            event,
            data: data.unwrap_or_else(empty_payload),
        };
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request")?;
        Self::parse(response).await
    }

    /// Push an event to every session
    pub async fn broadcast(
        &self,
        event: Option<String>,
        data: Option<Value>,
    ) -> Result<BroadcastResponse> {
        let url = format!("{}/mcp/broadcast", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&BroadcastRequest {
                event,
                data: data.unwrap_or_else(empty_payload),
            })
            .send()
            .await
            .context("Failed to send request")?;
        Self::parse(response).await
    }

    /// List sessions known to the relay
    pub async fn sessions(&self) -> Result<Vec<SessionInfo>> {
        let url = format!("{}/mcp/sessions", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to send request")?;
        Self::parse(response).await
    }

    /// Decode a success body, or turn an `{error}` body into an error.
    async fn parse<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json().await.context("Failed to parse response");
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(err) => bail!("Relay returned {}: {}", status, err.error),
            Err(_) => bail!("Relay returned {}: {}", status, body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let client = RelayClient::new("http://127.0.0.1:3845/");
        assert_eq!(client.base_url(), "http://127.0.0.1:3845");
    }
}
