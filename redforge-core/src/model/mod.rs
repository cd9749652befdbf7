//! Core data model: pure value types shared by every component.
//!
//! Every entity here is immutable once constructed and, once appended to the
//! `KnowledgeBase`, never mutated. Identifiers are opaque strings unique
//! within one evaluation.

mod assessment;
mod attack;
mod plan;
mod profile;
mod technique;

pub use assessment::{
    DualEvaluationResult, EvaluationMetrics, EvaluatorAssessment, Grade, RiskLevel,
    TargetAssessment, Vulnerability,
};
pub use attack::{Attack, Outcome, Severity, TestResult};
pub use plan::{Allocation, Phase, TestPlan};
pub use profile::TargetProfile;
pub use technique::{Technique, TechniqueSource};
