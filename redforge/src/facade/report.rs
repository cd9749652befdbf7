//! Persists the evaluator and target reports under `report_dir`, rendering
//! them via `redforge-report` and owning only the filesystem side: paths,
//! naming, and directory creation.

use std::path::Path;

use redforge_core::config::ReportFiles;
use redforge_core::model::DualEvaluationResult;

use crate::error::Result;

/// Writes all five report artifacts for one evaluation and returns their
/// paths. Timestamps embedded in filenames use `assessment_date`, so two
/// runs with the same evaluation never collide on a shared clock tick.
///
/// # Errors
/// Returns `Error::Io` if `report_dir` cannot be created or written to.
pub fn write_reports(report_dir: &str, result: &DualEvaluationResult) -> Result<ReportFiles> {
    std::fs::create_dir_all(report_dir)?;
    let dir = Path::new(report_dir);
    let ts = result.assessment_date.format("%Y%m%dT%H%M%SZ");

    let evaluator_markdown_path = dir.join(format!("EVALUATOR_{}_{ts}.md", result.target_name));
    let target_markdown_path = dir.join(format!("TARGET_{}_{ts}.md", result.target_name));
    let evaluator_json_path = dir.join(format!("{}_evaluator.json", result.evaluation_id));
    let target_json_path = dir.join(format!("{}_target.json", result.evaluation_id));
    let dual_json_path = dir.join(format!("{}_dual.json", result.evaluation_id));

    std::fs::write(&evaluator_markdown_path, redforge_report::markdown::render_evaluator_report(result))?;
    std::fs::write(&target_markdown_path, redforge_report::markdown::render_target_report(result))?;
    std::fs::write(
        &evaluator_json_path,
        serde_json::to_string_pretty(&redforge_report::json::evaluator_report(result))?,
    )?;
    std::fs::write(
        &target_json_path,
        serde_json::to_string_pretty(&redforge_report::json::target_report(result))?,
    )?;
    std::fs::write(&dual_json_path, serde_json::to_string_pretty(result)?)?;

    Ok(ReportFiles {
        evaluator_markdown: evaluator_markdown_path.display().to_string(),
        target_markdown: target_markdown_path.display().to_string(),
        evaluator_json: evaluator_json_path.display().to_string(),
        target_json: target_json_path.display().to_string(),
        dual_json: dual_json_path.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use redforge_core::model::{
        Attack, EvaluationMetrics, EvaluatorAssessment, Grade, Outcome, RiskLevel, Severity,
        TargetAssessment, TestResult,
    };
    use serde_json::json;

    fn sample_result() -> DualEvaluationResult {
        DualEvaluationResult {
            evaluation_id: "eval-test-1".to_string(),
            scenario: "prompt_injection".to_string(),
            target_name: "demo-target".to_string(),
            assessment_date: chrono::Utc::now(),
            total_time_seconds: 1.5,
            evaluator_assessment: EvaluatorAssessment {
                metrics: EvaluationMetrics::from_counts(1, 0, 1, 0),
                competition_score: 100.0,
                grade: Grade::A,
            },
            target_assessment: TargetAssessment {
                vulnerabilities: vec![],
                security_score: 100.0,
                risk_level: RiskLevel::Minimal,
                critical_count: 0,
                high_count: 0,
                medium_count: 0,
                low_count: 0,
                max_cvss: 0.0,
                avg_cvss: 0.0,
                estimated_fix_hours: 0.0,
            },
            attack_log: vec![Attack::new("a1", "prompt_injection", "T1", "Name", json!("x"), true, Severity::High)],
            result_log: vec![{
                let mut r = TestResult::new("a1-result", "a1", "demo-target", true, 1.0, true, "blocked", chrono::Utc::now());
                r.outcome = Outcome::TruePositive;
                r
            }],
            cancelled: false,
            cost_usd: 0.0,
        }
    }

    #[test]
    fn writes_all_five_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let result = sample_result();
        let files = write_reports(dir.path().to_str().unwrap(), &result).unwrap();
        assert!(Path::new(&files.evaluator_markdown).exists());
        assert!(Path::new(&files.target_markdown).exists());
        assert!(Path::new(&files.evaluator_json).exists());
        assert!(Path::new(&files.target_json).exists());
        assert!(Path::new(&files.dual_json).exists());
    }
}
