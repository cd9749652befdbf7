//! JSON report rendering, mirroring [`crate::markdown`] one field at a time
//! rather than serializing the domain types directly — the wire shape
//! (`report_type`, `security_summary`, `vulnerability_breakdown`,
//! `defense_metrics`, `remediation`, `vulnerabilities`) is a stable,
//! externally-documented contract independent of the internal model.

use redforge_core::model::DualEvaluationResult;
use serde_json::{Value, json};

/// Builds the evaluator-perspective JSON report.
#[must_use]
pub fn evaluator_report(result: &DualEvaluationResult) -> Value {
    let m = &result.evaluator_assessment.metrics;
    json!({
        "report_type": "evaluator",
        "evaluation_id": result.evaluation_id,
        "target": result.target_name,
        "scenario": result.scenario,
        "timestamp": result.assessment_date,
        "duration_seconds": result.total_time_seconds,
        "confusion_matrix": {
            "true_positives": m.true_positives,
            "false_positives": m.false_positives,
            "true_negatives": m.true_negatives,
            "false_negatives": m.false_negatives,
        },
        "metrics": {
            "precision": m.precision,
            "recall": m.recall,
            "f1": m.f1,
            "accuracy": m.accuracy,
            "fpr": m.fpr,
        },
        "competition_score": result.evaluator_assessment.competition_score,
        "grade": result.evaluator_assessment.grade.to_string(),
    })
}

/// Builds the target-security JSON report.
#[must_use]
pub fn target_report(result: &DualEvaluationResult) -> Value {
    let t = &result.target_assessment;
    json!({
        "report_type": "target",
        "evaluation_id": result.evaluation_id,
        "target": result.target_name,
        "scenario": result.scenario,
        "timestamp": result.assessment_date,
        "duration_seconds": result.total_time_seconds,
        "security_summary": {
            "security_score": t.security_score,
            "risk_level": format!("{:?}", t.risk_level).to_lowercase(),
            "total_vulnerabilities": t.vulnerabilities.len(),
        },
        "vulnerability_breakdown": {
            "critical": t.critical_count,
            "high": t.high_count,
            "medium": t.medium_count,
            "low": t.low_count,
            "avg_cvss": t.avg_cvss,
            "max_cvss": t.max_cvss,
        },
        "defense_metrics": {
            "attack_success_rate": attack_success_rate(result),
            "defense_success_rate": 1.0 - attack_success_rate(result),
            "total_tests": result.result_log.len(),
        },
        "remediation": {
            "estimated_hours": t.estimated_fix_hours,
            "priority_fixes": t.vulnerabilities.iter()
                .filter(|v| matches!(v.severity, redforge_core::model::Severity::Critical | redforge_core::model::Severity::High))
                .map(|v| v.remediation.clone())
                .collect::<Vec<_>>(),
        },
        "vulnerabilities": t.vulnerabilities.iter().map(|v| json!({
            "id": v.id,
            "cvss_score": v.cvss_score,
            "severity": format!("{:?}", v.severity).to_lowercase(),
            "technique_id": v.technique_id,
            "description": v.description,
            "remediation": v.remediation,
        })).collect::<Vec<_>>(),
    })
}

fn attack_success_rate(result: &DualEvaluationResult) -> f64 {
    let total = result.result_log.len();
    if total == 0 {
        return 0.0;
    }
    let evaded = result.target_assessment.vulnerabilities.len();
    evaded as f64 / total as f64
}
