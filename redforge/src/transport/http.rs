//! `reqwest`-based implementation of [`TargetClient`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};

use super::TargetClient;
use crate::error::{Error, Result};

/// Retries for a connection failure or a `5xx`/429 response before giving
/// up and surfacing `Error::Transient`; a flaky target is retried instead
/// of being scored identically to one returning garbage.
const MAX_RETRIES: u32 = 2;
const BASE_DELAY_MS: u64 = 200;
const BACKOFF_FACTOR: f64 = 2.0;

fn backoff_delay(attempt: u32) -> Duration {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let millis = (BASE_DELAY_MS as f64 * BACKOFF_FACTOR.powi(attempt as i32)).round() as u64;
    Duration::from_millis(millis)
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// The target's parsed response to one attack, per the external interface's
/// wire contract: the first `text` part must parse as JSON containing at
/// least `success`.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetResponse {
    pub success: bool,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub state_changes: Option<Value>,
}

/// HTTP client sending the `{kind: "message", role: "user", parts: [...]}`
/// envelope to a target agent and parsing its response.
pub struct HttpTargetClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTargetClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Extracts the first `parts[].text` and parses it as a
    /// [`TargetResponse`]; `None` on any shape mismatch, which the oracle
    /// treats as detected per the default oracle's unparseable-response
    /// rule.
    async fn parse_response(response: reqwest::Response) -> Option<TargetResponse> {
        let body: Value = response.json().await.ok()?;
        let first_text = body
            .get("parts")
            .and_then(Value::as_array)
            .and_then(|parts| parts.iter().find_map(|p| p.get("text")))
            .and_then(Value::as_str)?;
        serde_json::from_str(first_text).ok()
    }
}

#[async_trait]
impl TargetClient for HttpTargetClient {
    async fn send_attack(&self, command: Value) -> Result<Option<TargetResponse>> {
        let text = serde_json::to_string(&command)?;
        let envelope = json!({
            "kind": "message",
            "role": "user",
            "parts": [ { "kind": "text", "text": text } ],
        });

        for attempt in 0..=MAX_RETRIES {
            match self.client.post(&self.base_url).json(&envelope).send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(Self::parse_response(response).await);
                    }
                    if !is_retryable_status(status) {
                        return Ok(None);
                    }
                    if attempt == MAX_RETRIES {
                        return Err(Error::Eval(redforge_core::Error::Transient(format!(
                            "target responded {status} after {} attempts",
                            MAX_RETRIES + 1
                        ))));
                    }
                    tracing::debug!(%status, attempt, "transient target response, retrying");
                }
                Err(e) if e.is_connect() || e.is_timeout() => {
                    if attempt == MAX_RETRIES {
                        return Err(Error::Eval(redforge_core::Error::Transient(format!(
                            "connection failed after {} attempts: {e}",
                            MAX_RETRIES + 1
                        ))));
                    }
                    tracing::debug!(error = %e, attempt, "transient connection failure, retrying");
                }
                Err(e) => {
                    tracing::debug!(error = %e, "target request failed, treating as unparseable");
                    return Ok(None);
                }
            }
            tokio::time::sleep(backoff_delay(attempt)).await;
        }
        unreachable!("loop always returns on its last iteration")
    }

    async fn fetch_agent_card(&self) -> Result<Value> {
        let url = format!("{}/.well-known/agent-card.json", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        response
            .json::<Value>()
            .await
            .map_err(|e| Error::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_response_deserializes_minimal() {
        let v: TargetResponse = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(v.success);
        assert!(v.action_taken.is_none());
    }
}
