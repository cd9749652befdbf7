//! Outbound transport to the target agent.
//!
//! The direction is reversed from a served transport: this crate is the
//! client. [`TargetClient`] sends the fixed request envelope documented by
//! the evaluator's external interface and parses the target's response,
//! routing anything unparseable through the caller-supplied default.

mod http;

pub use http::{HttpTargetClient, TargetResponse};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One outbound message exchange with a target.
#[async_trait]
pub trait TargetClient: Send + Sync {
    /// Sends the command envelope for one attack and returns the parsed
    /// response, or `None` if the response was unparseable (HTTP error,
    /// missing `parts`, or non-JSON first text part).
    async fn send_attack(&self, command: Value) -> Result<Option<TargetResponse>>;

    /// Fetches the target's self-description from its well-known endpoint.
    async fn fetch_agent_card(&self) -> Result<Value>;
}
