use serde::{Deserialize, Serialize};

/// Planner phases, forming the state machine `exploration → exploitation →
/// validation` driven by per-round metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Exploration,
    Exploitation,
    Validation,
}

/// One line item of a `TestPlan`: how many tests to allocate to a category
/// and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    pub category: String,
    pub count: usize,
    pub reason: String,
}

/// The `AdaptivePlanner`'s output for one round: what to generate, and how
/// many, with the reasoning that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestPlan {
    pub phase: Phase,
    pub allocations: Vec<Allocation>,
    pub total: usize,
    pub rationale: String,
}

impl TestPlan {
    #[must_use]
    pub fn new(phase: Phase, allocations: Vec<Allocation>, rationale: impl Into<String>) -> Self {
        let total = allocations.iter().map(|a| a.count).sum();
        Self {
            phase,
            allocations,
            total,
            rationale: rationale.into(),
        }
    }
}
