//! Error types for the `redforge` engine crate.

use thiserror::Error;

/// Top-level error type for engine operations. Wraps `redforge_core::Error`
/// for the evaluation taxonomy and adds the ambient I/O-adjacent failure
/// modes the engine itself can hit (config loading, HTTP transport).
#[derive(Debug, Error)]
pub enum Error {
    /// An evaluation-taxonomy error (see `redforge_core::error::Error`).
    #[error(transparent)]
    Eval(#[from] redforge_core::Error),

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// Outbound HTTP transport failure talking to the target.
    #[error("transport error: {0}")]
    Transport(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Fatal, non-recoverable failure.
    #[error("fatal error: {0}")]
    Fatal(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
