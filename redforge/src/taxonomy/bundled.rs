//! A small, fixed sample taxonomy shipped in the binary so the crate is
//! runnable without an external ATT&CK/ATLAS data file.

use redforge_core::model::{Technique, TechniqueSource};

use super::TaxonomyProvider;

/// Bundled ATT&CK + ATLAS sample covering the techniques the built-in
/// scenarios reference.
pub struct BundledTaxonomyProvider;

impl TaxonomyProvider for BundledTaxonomyProvider {
    fn name(&self) -> &str {
        "bundled-sample"
    }

    fn all_techniques(&self) -> Vec<Technique> {
        vec![
            Technique::new(
                "T1566",
                "Phishing-style Prompt Injection",
                TechniqueSource::Attack,
                vec!["initial-access".to_string()],
                vec!["web".to_string(), "api".to_string()],
            ),
            Technique::new(
                "T1204",
                "User Execution via Tool Call",
                TechniqueSource::Attack,
                vec!["execution".to_string()],
                vec!["web".to_string()],
            ),
            Technique::new(
                "AML.T0051",
                "LLM Prompt Injection",
                TechniqueSource::Atlas,
                vec!["initial-access".to_string()],
                vec!["llm".to_string(), "api".to_string()],
            ),
            Technique::new(
                "AML.T0054",
                "LLM Jailbreak via Role Reframing",
                TechniqueSource::Atlas,
                vec!["defense-evasion".to_string()],
                vec!["llm".to_string()],
            ),
            Technique::new(
                "AML.T0043",
                "Craft Adversarial Data",
                TechniqueSource::Atlas,
                vec!["ml-attack-staging".to_string()],
                vec!["llm".to_string(), "api".to_string()],
            ),
            Technique::new(
                "T1499",
                "Endpoint Denial of Service via Batch Flood",
                TechniqueSource::Attack,
                vec!["impact".to_string()],
                Vec::new(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_source_tagging() {
        let techniques = BundledTaxonomyProvider.all_techniques();
        assert!(techniques.iter().any(|t| t.source == TechniqueSource::Attack));
        assert!(techniques.iter().any(|t| t.source == TechniqueSource::Atlas));
    }

    #[test]
    fn does_not_drop_records_across_calls() {
        let provider = BundledTaxonomyProvider;
        assert_eq!(
            provider.all_techniques().len(),
            provider.all_techniques().len()
        );
    }
}
