//! Pluggable attack-family definitions: templates, techniques, the
//! ground-truth oracle, and benign probes for measuring false positives.

mod comprehensive_security;
mod prompt_injection;

pub use comprehensive_security::ComprehensiveSecurityScenario;
pub use prompt_injection::PromptInjectionScenario;

use redforge_core::model::{Attack, Technique};

use crate::generator::PayloadTemplate;
use crate::transport::TargetResponse;

/// A benign, non-malicious probe used to measure false-positive rate. Not
/// yet an `Attack` — the scheduler assigns the `attack_id` on emission.
#[derive(Debug, Clone)]
pub struct BenignProbeSpec {
    pub technique_id: String,
    pub technique_name: String,
    pub payload: String,
}

/// The capability set every attack family implements: `{name, description,
/// templates(), techniques(), oracle(attack, response), benign_probes()}`.
pub trait Scenario: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn templates(&self) -> Vec<PayloadTemplate>;
    fn techniques(&self) -> Vec<Technique>;

    /// Labels a target's response to one attack as a detection event.
    fn oracle(&self, attack: &Attack, response: Option<&TargetResponse>) -> bool {
        default_oracle(response)
    }

    fn benign_probes(&self) -> Vec<BenignProbeSpec>;
}

/// The default oracle: a response that fails to parse, or never arrives,
/// is treated as `detected = true` (blocked). Otherwise `detected =
/// ¬response.success` — a `success: true` response means the attack's
/// action was carried out, i.e. evaded detection.
#[must_use]
pub fn default_oracle(response: Option<&TargetResponse>) -> bool {
    response.is_none_or(|r| !r.success)
}

/// Resolves a scenario by name, the scenario-name half of the facade's
/// "unknown scenario" validation.
#[must_use]
pub fn build_scenario(name: &str) -> Option<Box<dyn Scenario>> {
    match name {
        "prompt_injection" => Some(Box::new(PromptInjectionScenario)),
        "comprehensive_security" => Some(Box::new(ComprehensiveSecurityScenario)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_oracle_blocks_unparseable_response() {
        assert!(default_oracle(None));
    }

    #[test]
    fn default_oracle_inverts_success() {
        let succeeded = TargetResponse {
            success: true,
            action_taken: None,
            details: None,
            state_changes: None,
        };
        assert!(!default_oracle(Some(&succeeded)));
    }

    #[test]
    fn unknown_scenario_resolves_to_none() {
        assert!(build_scenario("not_a_real_scenario").is_none());
    }
}
