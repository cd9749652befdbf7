use serde::{Deserialize, Serialize};

/// Which URLs the facade should treat as evaluation participants. Only
/// `target` is required; missing it is a validation error before anything
/// else runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantsConfig {
    pub target: String,
}

/// Tagged configuration record driving one `Ecosystem::evaluate` call.
/// Unknown keys are rejected at the facade boundary, not deep in the call
/// stack; documented defaults live here rather than scattered through the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvaluationConfig {
    pub scenario: String,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default = "default_budget_usd")]
    pub budget_usd: f64,
    #[serde(default)]
    pub use_sandbox: bool,
    #[serde(default)]
    pub use_cost_optimization: bool,
    #[serde(default = "default_true")]
    pub use_coverage_tracking: bool,
    #[serde(default = "default_agent_count")]
    pub num_boundary_probers: usize,
    #[serde(default = "default_agent_count")]
    pub num_exploiters: usize,
    #[serde(default = "default_agent_count")]
    pub num_mutators: usize,
    #[serde(default = "default_agent_count")]
    pub num_validators: usize,
    #[serde(default)]
    pub random_seed: Option<u64>,
    #[serde(default)]
    pub mitre: Option<bool>,
}

fn default_max_rounds() -> usize {
    10
}

fn default_budget_usd() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_agent_count() -> usize {
    1
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            scenario: String::new(),
            max_rounds: default_max_rounds(),
            budget_usd: default_budget_usd(),
            use_sandbox: false,
            use_cost_optimization: false,
            use_coverage_tracking: default_true(),
            num_boundary_probers: default_agent_count(),
            num_exploiters: default_agent_count(),
            num_mutators: default_agent_count(),
            num_validators: default_agent_count(),
            random_seed: None,
            mitre: None,
        }
    }
}

/// The full incoming RPC body to the Evaluator Service Facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatorRequest {
    pub participants: ParticipantsConfig,
    pub config: EvaluationConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_request() {
        let json = serde_json::json!({
            "participants": {"target": "http://localhost:9000"},
            "config": {"scenario": "prompt_injection"}
        });
        let req: EvaluatorRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.participants.target, "http://localhost:9000");
        assert_eq!(req.config.max_rounds, 10);
        assert!(req.config.use_coverage_tracking);
    }

    #[test]
    fn rejects_unknown_config_keys() {
        let json = serde_json::json!({
            "scenario": "prompt_injection",
            "bogus_field": true
        });
        let result: Result<EvaluationConfig, _> = serde_json::from_value(json);
        assert!(result.is_err());
    }
}
