//! The five role-typed agents: `BoundaryProber`, `Exploiter`, `Mutator`,
//! `Validator`, `Judge`. All share `{id, step(kb_view) -> produced
//! entities}`; scheduling is cooperative and dependency-ordered (see the
//! `ecosystem` module).

mod boundary_prober;
mod exploiter;
mod judge;
mod mutator;
mod validator;

pub use boundary_prober::BoundaryProber;
pub use exploiter::Exploiter;
pub use judge::Judge;
pub use mutator::Mutator;
pub use validator::Validator;

use std::collections::HashMap;

use redforge_core::model::{Attack, Technique};

use crate::generator::PayloadGenerator;
use crate::knowledge_base::KnowledgeBaseSnapshot;
use crate::scenarios::Scenario;

/// Read-only inputs one agent sees for a round. Agents hold only this view
/// and a `Generator` handle — never a reference to the scheduler or the
/// other agents, per the broken-cycle design in `SPEC_FULL.md`.
pub struct AgentContext<'a> {
    pub snapshot: &'a KnowledgeBaseSnapshot,
    pub techniques: &'a [Technique],
    pub scenario: &'a dyn Scenario,
    pub generator: &'a dyn PayloadGenerator,
    /// Per-category allocation counts from this round's `TestPlan`, keyed
    /// by `technique_id`. Weak categories carry a larger count than
    /// healthy ones; agents must look a technique up here rather than
    /// applying one uniform count to everything.
    pub allocations: &'a HashMap<String, usize>,
    pub seed: u64,
    pub round: usize,
}

impl AgentContext<'_> {
    /// This round's allocation for one technique, falling back to 1 if the
    /// plan carries no entry for it (e.g. a technique the planner hasn't
    /// scheduled this round).
    #[must_use]
    pub fn allocation_for(&self, technique_id: &str) -> usize {
        self.allocations.get(technique_id).copied().unwrap_or(1).max(1)
    }
}

/// Shared capability set: an identifier plus one step of work that
/// produces new `Attack`s (or, for `Validator`, tags on existing ones).
/// Agents never mutate another agent's outputs.
pub trait Agent: Send + Sync {
    fn id(&self) -> &str;

    /// Runs one step and returns the `Attack`s this agent produced this
    /// round. `Validator` returns no new attacks; it tags existing ones.
    fn step(&self, ctx: &AgentContext<'_>) -> Vec<Attack>;
}
