//! Markdown report rendering for one evaluation's two perspectives.
//!
//! Assembles a flat list of sections the way a scenario page is built up
//! section by section, then joins them. Each perspective gets its own
//! entry point; nothing here knows about HTTP or the filesystem.

use redforge_core::model::{DualEvaluationResult, Severity};

use crate::frontmatter;

/// Renders the evaluator-quality report: confusion matrix, derived
/// metrics, and grade.
#[must_use]
pub fn render_evaluator_report(result: &DualEvaluationResult) -> String {
    let m = &result.evaluator_assessment.metrics;
    let mut sections = Vec::new();

    sections.push("<!-- AUTO-GENERATED — DO NOT EDIT -->".to_string());
    sections.push(String::new());
    sections.push(frontmatter::generate(
        &result.evaluation_id,
        &result.target_name,
        &[result.scenario.as_str()],
    ));
    sections.push(String::new());

    sections.push(format!("# Evaluator Report: {}", result.target_name));
    sections.push(String::new());
    sections.push(format!("Scenario: `{}`", result.scenario));
    sections.push(String::new());
    sections.push(format!(
        "Grade: **{}** (competition score {:.1})",
        result.evaluator_assessment.grade, result.evaluator_assessment.competition_score
    ));
    sections.push(String::new());

    sections.push("## Confusion Matrix".to_string());
    sections.push(String::new());
    sections.push("| cell | count |".to_string());
    sections.push("|---|---|".to_string());
    sections.push(format!("| true positives | {} |", m.true_positives));
    sections.push(format!("| false positives | {} |", m.false_positives));
    sections.push(format!("| true negatives | {} |", m.true_negatives));
    sections.push(format!("| false negatives | {} |", m.false_negatives));
    sections.push(String::new());

    sections.push("## Derived Metrics".to_string());
    sections.push(String::new());
    sections.push("| metric | value |".to_string());
    sections.push("|---|---|".to_string());
    sections.push(format!("| precision | {:.3} |", m.precision));
    sections.push(format!("| recall | {:.3} |", m.recall));
    sections.push(format!("| f1 | {:.3} |", m.f1));
    sections.push(format!("| specificity | {:.3} |", m.specificity));
    sections.push(format!("| accuracy | {:.3} |", m.accuracy));
    sections.push(format!("| fpr | {:.3} |", m.fpr));
    sections.push(format!("| fnr | {:.3} |", m.fnr));
    sections.push(format!("| total tests | {} |", m.total));

    sections.join("\n")
}

/// Renders the target-security report: vulnerability table, severity
/// breakdown, and remediation estimate.
#[must_use]
pub fn render_target_report(result: &DualEvaluationResult) -> String {
    let t = &result.target_assessment;
    let mut sections = Vec::new();

    sections.push("<!-- AUTO-GENERATED — DO NOT EDIT -->".to_string());
    sections.push(String::new());
    sections.push(frontmatter::generate(
        &result.evaluation_id,
        &result.target_name,
        &[result.scenario.as_str()],
    ));
    sections.push(String::new());

    sections.push(format!("# Target Security Report: {}", result.target_name));
    sections.push(String::new());
    sections.push(format!(
        "Security score: **{:.1}** ({:?} risk)",
        t.security_score, t.risk_level
    ));
    sections.push(String::new());
    sections.push(format!(
        "{} vulnerabilities found, estimated {:.1}h to remediate.",
        t.vulnerabilities.len(),
        t.estimated_fix_hours
    ));
    sections.push(String::new());

    sections.push("## Severity Breakdown".to_string());
    sections.push(String::new());
    sections.push("| severity | count |".to_string());
    sections.push("|---|---|".to_string());
    sections.push(format!("| critical | {} |", t.critical_count));
    sections.push(format!("| high | {} |", t.high_count));
    sections.push(format!("| medium | {} |", t.medium_count));
    sections.push(format!("| low | {} |", t.low_count));
    sections.push(String::new());

    if !t.vulnerabilities.is_empty() {
        sections.push("## Vulnerabilities".to_string());
        sections.push(String::new());
        sections.push("| id | severity | technique | cvss | remediation |".to_string());
        sections.push("|---|---|---|---|---|".to_string());
        for v in &t.vulnerabilities {
            sections.push(format!(
                "| {} | {} | {} | {:.1} | {} |",
                v.id,
                severity_str(v.severity),
                v.technique_id,
                v.cvss_score,
                v.remediation
            ));
        }
    }

    sections.join("\n")
}

const fn severity_str(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "low",
        Severity::Medium => "medium",
        Severity::High => "high",
        Severity::Critical => "critical",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redforge_core::model::{
        Attack, EvaluationMetrics, EvaluatorAssessment, Grade, Outcome, RiskLevel, TargetAssessment,
        TestResult, Vulnerability,
    };
    use serde_json::json;

    fn sample_result() -> DualEvaluationResult {
        DualEvaluationResult {
            evaluation_id: "eval-test-1".to_string(),
            scenario: "prompt_injection".to_string(),
            target_name: "demo-target".to_string(),
            assessment_date: chrono::Utc::now(),
            total_time_seconds: 2.0,
            evaluator_assessment: EvaluatorAssessment {
                metrics: EvaluationMetrics::from_counts(3, 1, 2, 1),
                competition_score: 72.5,
                grade: Grade::C,
            },
            target_assessment: TargetAssessment {
                vulnerabilities: vec![Vulnerability {
                    id: "vuln-1".to_string(),
                    attack_id: "a1".to_string(),
                    technique_id: "T1".to_string(),
                    severity: Severity::High,
                    cvss_score: 7.5,
                    description: "missed injection".to_string(),
                    remediation: "sanitize input".to_string(),
                }],
                security_score: 60.0,
                risk_level: RiskLevel::Medium,
                critical_count: 0,
                high_count: 1,
                medium_count: 0,
                low_count: 0,
                max_cvss: 7.5,
                avg_cvss: 7.5,
                estimated_fix_hours: 4.0,
            },
            attack_log: vec![Attack::new("a1", "prompt_injection", "T1", "Name", json!("x"), true, Severity::High)],
            result_log: vec![{
                let mut r = TestResult::new("a1-result", "a1", "demo-target", false, 1.0, true, "missed", chrono::Utc::now());
                r.outcome = Outcome::FalseNegative;
                r
            }],
            cancelled: false,
            cost_usd: 0.1,
        }
    }

    #[test]
    fn evaluator_report_contains_confusion_matrix_and_grade() {
        let report = render_evaluator_report(&sample_result());
        assert!(report.starts_with("<!-- AUTO-GENERATED"));
        assert!(report.contains("# Evaluator Report: demo-target"));
        assert!(report.contains("Grade: **C**"));
        assert!(report.contains("| true positives | 3 |"));
    }

    #[test]
    fn target_report_lists_vulnerabilities() {
        let report = render_target_report(&sample_result());
        assert!(report.contains("# Target Security Report: demo-target"));
        assert!(report.contains("vuln-1"));
        assert!(report.contains("sanitize input"));
        assert!(report.contains("1 vulnerabilities found"));
    }

    #[test]
    fn target_report_omits_vulnerability_section_when_clean() {
        let mut result = sample_result();
        result.target_assessment.vulnerabilities.clear();
        let report = render_target_report(&result);
        assert!(!report.contains("## Vulnerabilities"));
    }
}
