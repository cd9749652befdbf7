//! `AdaptivePlanner`: the phase machine driving each round's `TestPlan`,
//! grounded in the original Python `adaptive_planner.py` this spec was
//! distilled from — same three phases, same constants, same early
//! termination conditions.

use std::collections::{HashMap, HashSet};

use redforge_core::model::{Allocation, Phase, TestPlan};
use serde_json::json;

/// Per-category F1 below this triggers the `exploitation` phase for that
/// category.
pub const WEAK_THRESHOLD: f64 = 0.6;
/// Share of the next batch routed to weak categories during `exploitation`.
pub const FOCUS_PERCENTAGE: f64 = 0.6;
/// `|ΔF1|` below this counts as a stable round.
pub const STABILITY_THRESHOLD: f64 = 0.05;
/// Minimum probes allocated per category during `exploration`.
pub const MIN_PER_CATEGORY: usize = 5;

/// One structured planner decision, kept for auditability per spec §4.9.
#[derive(Debug, Clone)]
pub struct PlannerDecisionLog {
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub round: usize,
    pub decision_kind: String,
    pub inputs: serde_json::Value,
    pub choice: String,
    pub reasoning: String,
}

/// What the planner decided for this round: keep going with a new plan, or
/// stop with a reason.
#[derive(Debug, Clone)]
pub enum PlannerOutcome {
    Continue(TestPlan),
    Stop(String),
}

/// Drives the `exploration → exploitation → validation` phase machine from
/// round metrics, and decides when an evaluation has converged.
pub struct AdaptivePlanner {
    weak_threshold: f64,
    focus_percentage: f64,
    stability_threshold: f64,
    min_per_category: usize,
    validation_minimum: f64,
    phase: Phase,
    f1_history: Vec<f64>,
    stable_streak: usize,
    rounds_without_weak: usize,
    tested_categories: HashSet<String>,
    decisions: Vec<PlannerDecisionLog>,
}

impl AdaptivePlanner {
    #[must_use]
    pub fn new(validation_minimum: f64) -> Self {
        Self {
            weak_threshold: WEAK_THRESHOLD,
            focus_percentage: FOCUS_PERCENTAGE,
            stability_threshold: STABILITY_THRESHOLD,
            min_per_category: MIN_PER_CATEGORY,
            validation_minimum,
            phase: Phase::Exploration,
            f1_history: Vec::new(),
            stable_streak: 0,
            rounds_without_weak: 0,
            tested_categories: HashSet::new(),
            decisions: Vec::new(),
        }
    }

    #[must_use]
    pub fn decisions(&self) -> &[PlannerDecisionLog] {
        &self.decisions
    }

    #[must_use]
    pub fn current_phase(&self) -> Phase {
        self.phase
    }

    fn log(
        &mut self,
        round: usize,
        decision_kind: &str,
        inputs: serde_json::Value,
        choice: &str,
        reasoning: impl Into<String>,
    ) {
        self.decisions.push(PlannerDecisionLog {
            timestamp: chrono::Utc::now(),
            round,
            decision_kind: decision_kind.to_string(),
            inputs,
            choice: choice.to_string(),
            reasoning: reasoning.into(),
        });
    }

    /// Decides the next `TestPlan`, or that the evaluation should stop,
    /// given this round's number, remaining budget, the full category
    /// list, and per-category F1 observed so far.
    #[must_use]
    pub fn decide(
        &mut self,
        round: usize,
        max_rounds: usize,
        budget_exhausted: bool,
        remaining_budget: f64,
        categories: &[String],
        per_category_f1: &HashMap<String, f64>,
        overall_f1: f64,
    ) -> PlannerOutcome {
        let weak_categories: Vec<String> = categories
            .iter()
            .filter(|c| per_category_f1.get(*c).is_some_and(|f1| *f1 < self.weak_threshold))
            .cloned()
            .collect();

        if round > 1 {
            if let Some(&previous) = self.f1_history.last() {
                let delta = (overall_f1 - previous).abs();
                if delta < self.stability_threshold {
                    self.stable_streak += 1;
                } else {
                    self.stable_streak = 0;
                }
            }
        }
        self.f1_history.push(overall_f1);

        if weak_categories.is_empty() {
            self.rounds_without_weak += 1;
        } else {
            self.rounds_without_weak = 0;
        }

        let stable = self.stable_streak >= 2;
        let inputs = json!({
            "overall_f1": overall_f1,
            "weak_categories": weak_categories,
            "stable_streak": self.stable_streak,
            "rounds_without_weak": self.rounds_without_weak,
            "remaining_budget": remaining_budget,
        });

        if round >= max_rounds {
            self.log(round, "stop", inputs, "stop", "max rounds reached");
            return PlannerOutcome::Stop("max rounds reached".to_string());
        }
        if budget_exhausted {
            self.log(round, "stop", inputs, "stop", "budget exhausted");
            return PlannerOutcome::Stop("budget exhausted".to_string());
        }
        if overall_f1 >= 0.90 && weak_categories.is_empty() && stable {
            self.log(round, "stop", inputs, "stop", "f1 converged with no weak categories");
            return PlannerOutcome::Stop("f1 converged with no weak categories".to_string());
        }
        if self.rounds_without_weak >= 3 && stable {
            self.log(
                round,
                "stop",
                inputs,
                "stop",
                "three stable rounds with no weak categories",
            );
            return PlannerOutcome::Stop("three stable rounds with no weak categories".to_string());
        }

        let next_phase = if round == 1 {
            Phase::Exploration
        } else if !weak_categories.is_empty() {
            Phase::Exploitation
        } else if stable && remaining_budget > self.validation_minimum {
            Phase::Validation
        } else {
            self.phase
        };
        self.phase = next_phase;

        let plan = match next_phase {
            Phase::Exploration => self.exploration_plan(categories),
            Phase::Exploitation => self.exploitation_plan(categories, &weak_categories),
            Phase::Validation => self.validation_plan(categories),
        };

        self.tested_categories.extend(categories.iter().cloned());
        self.log(
            round,
            "phase",
            inputs,
            &format!("{next_phase:?}"),
            plan.rationale.clone(),
        );

        PlannerOutcome::Continue(plan)
    }

    fn exploration_plan(&self, categories: &[String]) -> TestPlan {
        let allocations = categories
            .iter()
            .map(|c| Allocation {
                category: c.clone(),
                count: self.min_per_category,
                reason: "uniform exploration baseline".to_string(),
            })
            .collect();
        TestPlan::new(
            Phase::Exploration,
            allocations,
            "uniform allocation across all categories",
        )
    }

    fn exploitation_plan(&self, categories: &[String], weak: &[String]) -> TestPlan {
        let batch = (categories.len() * self.min_per_category).max(categories.len());
        let focus_total = ((batch as f64) * self.focus_percentage).round() as usize;
        let remainder_total = batch.saturating_sub(focus_total);

        let mut allocations = Vec::new();
        if !weak.is_empty() {
            let per_weak = (focus_total / weak.len()).max(1);
            for c in weak {
                allocations.push(Allocation {
                    category: c.clone(),
                    count: per_weak,
                    reason: "weak-category focus".to_string(),
                });
            }
        }
        if !categories.is_empty() {
            let per_uniform = (remainder_total / categories.len()).max(1);
            for c in categories {
                allocations.push(Allocation {
                    category: c.clone(),
                    count: per_uniform,
                    reason: "uniform remainder".to_string(),
                });
            }
        }
        TestPlan::new(
            Phase::Exploitation,
            allocations,
            format!("{}% focused on weak categories, remainder uniform", (self.focus_percentage * 100.0) as u32),
        )
    }

    fn validation_plan(&self, categories: &[String]) -> TestPlan {
        let untested: Vec<String> = categories
            .iter()
            .filter(|c| !self.tested_categories.contains(*c))
            .cloned()
            .collect();
        let targets = if untested.is_empty() { categories.to_vec() } else { untested };
        let allocations = targets
            .iter()
            .map(|c| Allocation {
                category: c.clone(),
                count: self.min_per_category,
                reason: "sampling previously-untested items".to_string(),
            })
            .collect();
        TestPlan::new(Phase::Validation, allocations, "validation sampling pass")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn categories() -> Vec<String> {
        vec!["T1".to_string(), "T2".to_string()]
    }

    #[test]
    fn round_one_is_uniform_exploration() {
        let mut planner = AdaptivePlanner::new(20.0);
        let outcome = planner.decide(1, 10, false, 100.0, &categories(), &HashMap::new(), 0.0);
        let PlannerOutcome::Continue(plan) = outcome else {
            panic!("expected continue");
        };
        assert!(matches!(plan.phase, Phase::Exploration));
        assert_eq!(plan.total, MIN_PER_CATEGORY * 2);
    }

    #[test]
    fn weak_category_triggers_exploitation() {
        let mut planner = AdaptivePlanner::new(20.0);
        planner.decide(1, 10, false, 100.0, &categories(), &HashMap::new(), 0.2);
        let mut f1s = HashMap::new();
        f1s.insert("T1".to_string(), 0.3);
        f1s.insert("T2".to_string(), 0.8);
        let outcome = planner.decide(2, 10, false, 100.0, &categories(), &f1s, 0.4);
        let PlannerOutcome::Continue(plan) = outcome else {
            panic!("expected continue");
        };
        assert!(matches!(plan.phase, Phase::Exploitation));
        assert!(plan.allocations.iter().any(|a| a.category == "T1" && a.reason.contains("focus")));
    }

    #[test]
    fn max_rounds_stops_the_evaluation() {
        let mut planner = AdaptivePlanner::new(20.0);
        let outcome = planner.decide(10, 10, false, 100.0, &categories(), &HashMap::new(), 0.5);
        assert!(matches!(outcome, PlannerOutcome::Stop(_)));
    }

    #[test]
    fn budget_exhaustion_stops_the_evaluation() {
        let mut planner = AdaptivePlanner::new(20.0);
        let outcome = planner.decide(2, 10, true, 0.0, &categories(), &HashMap::new(), 0.5);
        assert!(matches!(outcome, PlannerOutcome::Stop(_)));
    }

    #[test]
    fn decisions_are_logged_with_round_numbers() {
        let mut planner = AdaptivePlanner::new(20.0);
        planner.decide(1, 10, false, 100.0, &categories(), &HashMap::new(), 0.0);
        assert_eq!(planner.decisions().len(), 1);
        assert_eq!(planner.decisions()[0].round, 1);
    }
}
