use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Severity of a vulnerable technique, used both to label an `Attack`'s
/// ground truth and to weight the target's security score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// A candidate input crafted to probe the target. Carries the ground-truth
/// `is_malicious` flag the scoring engine compares against the target's
/// response.
///
/// Created by `BoundaryProber`/`Exploiter`/`Mutator`; never mutated once
/// appended to the `KnowledgeBase`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attack {
    pub attack_id: String,
    pub scenario: String,
    pub technique_id: String,
    pub technique_name: String,
    pub payload: Value,
    pub is_malicious: bool,
    pub severity: Severity,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Attack {
    #[must_use]
    pub fn new(
        attack_id: impl Into<String>,
        scenario: impl Into<String>,
        technique_id: impl Into<String>,
        technique_name: impl Into<String>,
        payload: Value,
        is_malicious: bool,
        severity: Severity,
    ) -> Self {
        Self {
            attack_id: attack_id.into(),
            scenario: scenario.into(),
            technique_id: technique_id.into(),
            technique_name: technique_name.into(),
            payload,
            is_malicious,
            severity,
            metadata: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// The four cells of a binary confusion matrix, derived from `detected` and
/// the referenced `Attack`'s `is_malicious` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Malicious attack, correctly detected.
    TruePositive,
    /// Benign probe, incorrectly flagged.
    FalsePositive,
    /// Benign probe, correctly allowed.
    TrueNegative,
    /// Malicious attack, missed — an evasion.
    FalseNegative,
}

impl Outcome {
    /// Computes the outcome per the fixed formula: `detected ∧ is_malicious
    /// ⇒ TP`, `detected ∧ ¬is_malicious ⇒ FP`, `¬detected ∧ is_malicious ⇒
    /// FN`, `¬detected ∧ ¬is_malicious ⇒ TN`.
    #[must_use]
    pub fn compute(detected: bool, is_malicious: bool) -> Self {
        match (detected, is_malicious) {
            (true, true) => Outcome::TruePositive,
            (true, false) => Outcome::FalsePositive,
            (false, true) => Outcome::FalseNegative,
            (false, false) => Outcome::TrueNegative,
        }
    }
}

/// The result of executing one `Attack` against the target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub result_id: String,
    pub attack_id: String,
    pub target_name: String,
    pub detected: bool,
    pub confidence: f64,
    pub outcome: Outcome,
    pub reason: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl TestResult {
    #[must_use]
    pub fn new(
        result_id: impl Into<String>,
        attack_id: impl Into<String>,
        target_name: impl Into<String>,
        detected: bool,
        confidence: f64,
        is_malicious: bool,
        reason: impl Into<String>,
        timestamp: chrono::DateTime<chrono::Utc>,
    ) -> Self {
        Self {
            result_id: result_id.into(),
            attack_id: attack_id.into(),
            target_name: target_name.into(),
            detected,
            confidence: confidence.clamp(0.0, 1.0),
            outcome: Outcome::compute(detected, is_malicious),
            reason: reason.into(),
            timestamp,
            metadata: HashMap::new(),
        }
    }
}
