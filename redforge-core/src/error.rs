//! Error taxonomy for the evaluation engine.
//!
//! Kinds, not type names: each variant maps to one of the propagation
//! policies described by the facade (recovered locally, or surfaced to the
//! caller). `ValidationError` and `Fatal` are the only variants that end an
//! evaluation; everything else is recorded against the offending attack,
//! test, or round and the evaluation continues.

use thiserror::Error;

/// Errors raised anywhere in the evaluation pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input to the facade. The evaluation never starts.
    #[error("validation error: {0}")]
    Validation(String),

    /// Network timeout, generator rate-limit, or sandbox not ready.
    /// Retried by the caller up to a fixed number of attempts before being
    /// reported as a failed test.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The target's response could not be parsed; routed through the
    /// scenario's default oracle behavior.
    #[error("oracle ambiguous: {0}")]
    OracleAmbiguous(String),

    /// Rejected by the `KnowledgeBase` because the id already exists for
    /// that kind. The producing agent is skipped for this entity; the
    /// evaluation continues.
    #[error("duplicate entity: kind={kind} id={id}")]
    Duplicate {
        /// Entity kind the duplicate was rejected from.
        kind: String,
        /// The id that was already present.
        id: String,
    },

    /// No entity of the requested kind/id exists.
    #[error("not found: kind={kind} id={id}")]
    NotFound {
        /// Entity kind that was queried.
        kind: String,
        /// The id that was not found.
        id: String,
    },

    /// Wall-clock, test-count, or cost budget exhausted. A partial
    /// `DualEvaluationResult` is returned.
    #[error("budget exceeded: {0}")]
    BudgetExceeded(String),

    /// Cooperative cancellation was observed. A partial result labeled
    /// `cancelled` is returned.
    #[error("evaluation cancelled")]
    Cancelled,

    /// Panic-class failure: disk full, invariant violated. The evaluation
    /// aborts and persists whatever is in the snapshot.
    #[error("fatal error: {0}")]
    Fatal(String),
}

impl Error {
    /// Whether this error should end the evaluation outright, as opposed to
    /// being recorded and recovered from locally.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::Fatal(_))
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_and_fatal_are_terminal() {
        assert!(Error::Validation("bad".into()).is_terminal());
        assert!(Error::Fatal("disk full".into()).is_terminal());
    }

    #[test]
    fn everything_else_is_recoverable() {
        assert!(!Error::Transient("timeout".into()).is_terminal());
        assert!(!Error::Cancelled.is_terminal());
        assert!(!Error::Duplicate {
            kind: "attack".into(),
            id: "a1".into()
        }
        .is_terminal());
    }
}
