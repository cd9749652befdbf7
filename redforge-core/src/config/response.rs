use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::EvaluationMetrics;

/// Outcome of one evaluation as surfaced by the facade. `CompletedWithErrors`
/// distinguishes a run that finished but observed transient errors along the
/// way from a clean `Completed`; `Cancelled` is its own, distinct outcome —
/// a partial result returned because cooperative cancellation was observed,
/// not because anything went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvaluatorStatus {
    Completed,
    CompletedWithErrors,
    Cancelled,
    Failed,
}

/// Descriptive, non-filtering coverage snapshot from the `CoverageTracker`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageReport {
    pub taxonomy_name: String,
    pub total_techniques_available: usize,
    pub techniques_exercised: usize,
    pub per_tactic_counts: HashMap<String, usize>,
}

/// On-disk paths of the persisted report artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportFiles {
    pub evaluator_markdown: String,
    pub target_markdown: String,
    pub evaluator_json: String,
    pub target_json: String,
    pub dual_json: String,
}

/// The single, unified RPC response returned for every evaluation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorResponse {
    pub status: EvaluatorStatus,
    pub target_name: String,
    pub scenario: String,
    pub metrics: EvaluationMetrics,
    pub evasions_found: usize,
    pub total_tests: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<CoverageReport>,
    pub cost_usd: f64,
    pub duration_seconds: f64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_files: Option<ReportFiles>,
}
