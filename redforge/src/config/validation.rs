//! Request validation at the facade boundary.
//!
//! Per the error taxonomy, a `ValidationError` here means the evaluation
//! never starts — nothing is appended to the `KnowledgeBase`.

use redforge_core::Error;
use redforge_core::config::EvaluatorRequest;

/// Scenario names the engine ships with. Kept in one place so the facade's
/// "unknown scenario" error can enumerate them.
pub const KNOWN_SCENARIOS: [&str; 2] = ["prompt_injection", "comprehensive_security"];

/// Validates an incoming evaluator request before any agent runs.
///
/// # Errors
/// Returns `Error::Validation` if `participants.target` is empty, the
/// scenario name is unknown, or any numeric config field is out of range.
pub fn validate_request(request: &EvaluatorRequest) -> Result<(), Error> {
    if request.participants.target.trim().is_empty() {
        return Err(Error::Validation(
            "participants.target is required".to_string(),
        ));
    }

    if !KNOWN_SCENARIOS.contains(&request.config.scenario.as_str()) {
        return Err(Error::Validation(format!(
            "unknown scenario '{}', available: {}",
            request.config.scenario,
            KNOWN_SCENARIOS.join(", ")
        )));
    }

    if request.config.budget_usd < 0.0 {
        return Err(Error::Validation("budget_usd must be >= 0".to_string()));
    }

    for (field, count) in [
        ("num_boundary_probers", request.config.num_boundary_probers),
        ("num_exploiters", request.config.num_exploiters),
        ("num_mutators", request.config.num_mutators),
        ("num_validators", request.config.num_validators),
    ] {
        if count == 0 {
            return Err(Error::Validation(format!("{field} must be >= 1")));
        }
    }

    Ok(())
}
