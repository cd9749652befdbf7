//! `CoverageTracker`: holds the set of techniques observed in executed
//! `Attack`s and reports, on request, how that set relates to everything the
//! active taxonomy offers. Purely descriptive — it never filters what the
//! planner or agents do.

use std::collections::{HashMap, HashSet};

use redforge_core::config::CoverageReport;
use redforge_core::model::{Attack, Technique};

/// Accumulates technique ids seen in executed attacks across rounds.
#[derive(Debug, Default)]
pub struct CoverageTracker {
    exercised: HashSet<String>,
}

impl CoverageTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the techniques exercised by one round's executed attacks.
    pub fn observe(&mut self, attacks: &[Attack]) {
        for attack in attacks {
            self.exercised.insert(attack.technique_id.clone());
        }
    }

    #[must_use]
    pub fn techniques_exercised(&self) -> usize {
        self.exercised.len()
    }

    /// Builds a descriptive coverage report against the taxonomy's full
    /// technique catalog, without filtering or dropping anything.
    #[must_use]
    pub fn report(&self, taxonomy_name: &str, all_techniques: &[Technique]) -> CoverageReport {
        let mut per_tactic_counts: HashMap<String, usize> = HashMap::new();
        for technique in all_techniques {
            if !self.exercised.contains(&technique.technique_id) {
                continue;
            }
            for tactic in &technique.tactics {
                *per_tactic_counts.entry(tactic.clone()).or_insert(0) += 1;
            }
        }

        CoverageReport {
            taxonomy_name: taxonomy_name.to_string(),
            total_techniques_available: all_techniques.len(),
            techniques_exercised: self.techniques_exercised(),
            per_tactic_counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redforge_core::model::{Severity, TechniqueSource};
    use serde_json::json;

    fn technique(id: &str, tactic: &str) -> Technique {
        Technique::new(id, "Name", TechniqueSource::Attack, vec![tactic.to_string()], Vec::new())
    }

    fn attack(technique_id: &str) -> Attack {
        Attack::new(
            "a1",
            "prompt_injection",
            technique_id,
            "Name",
            json!("payload"),
            true,
            Severity::Medium,
        )
    }

    #[test]
    fn never_exceeds_exercised_techniques() {
        let mut tracker = CoverageTracker::new();
        tracker.observe(&[attack("T1"), attack("T1"), attack("T2")]);
        assert_eq!(tracker.techniques_exercised(), 2);
    }

    #[test]
    fn report_is_purely_descriptive() {
        let mut tracker = CoverageTracker::new();
        tracker.observe(&[attack("T1")]);
        let all = vec![technique("T1", "initial-access"), technique("T2", "impact")];
        let report = tracker.report("att&ck", &all);
        assert_eq!(report.total_techniques_available, 2);
        assert_eq!(report.techniques_exercised, 1);
        assert_eq!(report.per_tactic_counts.get("initial-access"), Some(&1));
        assert!(!report.per_tactic_counts.contains_key("impact"));
    }
}
