//! Builds a `TargetProfile` from the target's self-description. Purely
//! syntactic — never contacts the target itself.

use redforge_core::model::TargetProfile;
use serde_json::Value;

/// Parses a target's `/.well-known/agent-card.json` body into a
/// `TargetProfile`. Unknown or missing fields default per the contract:
/// `agent_type = "generic"`, `risk_level = "medium"`, empty lists otherwise.
#[must_use]
pub fn profile_from_agent_card(card: &Value) -> TargetProfile {
    let name = card
        .get("name")
        .and_then(Value::as_str)
        .unwrap_or("unknown-target")
        .to_string();

    let platforms = string_list(card.get("platforms"));
    let capabilities = string_list(card.get("capabilities"));
    let domains = string_list(card.get("domains"));

    let agent_type = card
        .get("agent_type")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| infer_agent_type(card));

    let risk_level = card
        .get("risk_level")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| "medium".to_string());

    TargetProfile {
        name,
        platforms,
        agent_type,
        risk_level,
        capabilities,
        domains,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Infers `agent_type` from `skills`/`description` when the card omits it
/// outright, falling back to `"generic"` per contract.
fn infer_agent_type(card: &Value) -> String {
    let has_skills = card
        .get("skills")
        .and_then(Value::as_array)
        .is_some_and(|s| !s.is_empty());
    if has_skills { "agent".to_string() } else { "generic".to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_default() {
        let card = json!({"name": "demo"});
        let profile = profile_from_agent_card(&card);
        assert_eq!(profile.name, "demo");
        assert_eq!(profile.agent_type, "generic");
        assert_eq!(profile.risk_level, "medium");
        assert!(profile.platforms.is_empty());
    }

    #[test]
    fn full_card_is_parsed() {
        let card = json!({
            "name": "demo-bot",
            "platforms": ["linux", "web"],
            "capabilities": ["tool-use"],
            "domains": ["finance"],
            "risk_level": "high",
        });
        let profile = profile_from_agent_card(&card);
        assert_eq!(profile.platforms, vec!["linux", "web"]);
        assert_eq!(profile.risk_level, "high");
    }

    #[test]
    fn skills_infer_agent_type() {
        let card = json!({"name": "demo", "skills": [{"id": "search"}]});
        let profile = profile_from_agent_card(&card);
        assert_eq!(profile.agent_type, "agent");
    }
}
