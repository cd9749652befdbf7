//! Optional isolation boundary for code fragments derived from payloads.
//!
//! No container runtime ships with this crate; the only implementation is
//! the `Unavailable`-returning stub. The trait seam exists so a
//! container-backed implementation can be dropped in later without
//! touching any caller.

use async_trait::async_trait;
use std::time::Duration;

/// Outcome of a sandboxed execution. `Timeout` and `Unavailable` are normal
/// outcomes, not errors — callers branch on the variant rather than on a
/// `Result`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SandboxOutcome {
    /// The fragment ran to completion within its resource limits.
    Completed { stdout: String, exit_code: i32 },
    /// The fragment exceeded its wall-clock timeout.
    Timeout,
    /// No host isolation primitive is available; execution was refused.
    Unavailable,
}

/// `execute(fragment, timeout, cpu_limit, memory_limit, network_enabled) ->
/// Outcome`. Implementations must guarantee no filesystem persistence
/// beyond a scratch area destroyed on return, no inherited credentials, a
/// hard wall-clock timeout, and network off by default. If the host
/// isolation primitive is unavailable, implementations MUST return
/// `Unavailable` rather than falling back to in-process execution.
#[async_trait]
pub trait Sandbox: Send + Sync {
    async fn execute(
        &self,
        fragment: &str,
        timeout: Duration,
        cpu_limit: f64,
        memory_limit_mb: u64,
        network_enabled: bool,
    ) -> SandboxOutcome;

    /// Whether this sandbox has a working host isolation primitive,
    /// checked once at evaluation setup so a misconfigured `use_sandbox`
    /// fails fast as a `ValidationError` before any target call.
    fn is_available(&self) -> bool {
        true
    }
}

/// The only implementation shipped: no container runtime is available, so
/// every call is refused.
#[derive(Debug, Default)]
pub struct UnavailableSandbox;

#[async_trait]
impl Sandbox for UnavailableSandbox {
    async fn execute(
        &self,
        _fragment: &str,
        _timeout: Duration,
        _cpu_limit: f64,
        _memory_limit_mb: u64,
        _network_enabled: bool,
    ) -> SandboxOutcome {
        SandboxOutcome::Unavailable
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unavailable_sandbox_never_executes() {
        let sandbox = UnavailableSandbox;
        let outcome = sandbox
            .execute("echo hi", Duration::from_secs(1), 1.0, 128, false)
            .await;
        assert_eq!(outcome, SandboxOutcome::Unavailable);
    }

    #[test]
    fn unavailable_sandbox_reports_unavailable() {
        assert!(!UnavailableSandbox.is_available());
    }
}
