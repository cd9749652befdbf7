use serde::{Deserialize, Serialize};

use super::attack::{Attack, Severity, TestResult};

/// Derived confusion-matrix metrics for one result set. Never stored
/// mutably outside a round snapshot; always a pure function of its inputs.
///
/// Zero-denominator convention: every ratio that would divide by zero is
/// reported as `0.0`, never `NaN`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub specificity: f64,
    pub accuracy: f64,
    pub fpr: f64,
    pub fnr: f64,
    pub total: usize,
}

impl EvaluationMetrics {
    /// Computes every derived field from raw confusion-matrix counts,
    /// applying the zero-denominator-is-zero convention throughout.
    #[must_use]
    pub fn from_counts(tp: usize, fp: usize, tn: usize, fn_: usize) -> Self {
        let total = tp + fp + tn + fn_;
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        let specificity = ratio(tn, tn + fp);
        let accuracy = ratio(tp + tn, total);
        let fpr = ratio(fp, fp + tn);
        let fnr = ratio(fn_, fn_ + tp);
        Self {
            true_positives: tp,
            false_positives: fp,
            true_negatives: tn,
            false_negatives: fn_,
            precision,
            recall,
            f1,
            specificity,
            accuracy,
            fpr,
            fnr,
            total,
        }
    }

    /// Empty-input boundary: all metrics zero, nothing divided by zero.
    #[must_use]
    pub fn zero() -> Self {
        Self::from_counts(0, 0, 0, 0)
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Letter grade mapped from `competition_score` by fixed thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::A
        } else if score >= 80.0 {
            Grade::B
        } else if score >= 70.0 {
            Grade::C
        } else if score >= 60.0 {
            Grade::D
        } else {
            Grade::F
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        write!(f, "{s}")
    }
}

/// Evaluator-quality perspective: how well the target's detections matched
/// ground truth, distilled to a single competition score and grade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorAssessment {
    pub metrics: EvaluationMetrics,
    pub competition_score: f64,
    pub grade: Grade,
}

/// Risk level, a step function on `security_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            RiskLevel::Minimal
        } else if score >= 70.0 {
            RiskLevel::Low
        } else if score >= 50.0 {
            RiskLevel::Medium
        } else if score >= 25.0 {
            RiskLevel::High
        } else {
            RiskLevel::Critical
        }
    }
}

/// One missed attack (a false negative), materialized into a CVSS-like
/// vulnerability record for the target-security report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    pub attack_id: String,
    pub technique_id: String,
    pub severity: Severity,
    pub cvss_score: f64,
    pub description: String,
    pub remediation: String,
}

/// Target-security perspective: how resistant the target was, expressed as
/// a vulnerability list plus a single security score and risk band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetAssessment {
    pub vulnerabilities: Vec<Vulnerability>,
    pub security_score: f64,
    pub risk_level: RiskLevel,
    pub critical_count: usize,
    pub high_count: usize,
    pub medium_count: usize,
    pub low_count: usize,
    pub max_cvss: f64,
    pub avg_cvss: f64,
    pub estimated_fix_hours: f64,
}

/// The complete output of one evaluation: both perspectives plus the full
/// attack/result log, owned by value once the evaluation ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DualEvaluationResult {
    pub evaluation_id: String,
    pub scenario: String,
    pub target_name: String,
    pub assessment_date: chrono::DateTime<chrono::Utc>,
    pub total_time_seconds: f64,
    pub evaluator_assessment: EvaluatorAssessment,
    pub target_assessment: TargetAssessment,
    pub attack_log: Vec<Attack>,
    pub result_log: Vec<TestResult>,
    pub cancelled: bool,
    pub cost_usd: f64,
}
