use serde::{Deserialize, Serialize};

/// A structured profile of the target, derived once per evaluation from its
/// self-description. Unknown fields default rather than failing: `agent_type
/// = "generic"`, `risk_level = "medium"`, empty lists otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetProfile {
    pub name: String,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default = "default_agent_type")]
    pub agent_type: String,
    #[serde(default = "default_risk_level")]
    pub risk_level: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub domains: Vec<String>,
}

fn default_agent_type() -> String {
    "generic".to_string()
}

fn default_risk_level() -> String {
    "medium".to_string()
}

impl TargetProfile {
    /// Whether the profile looks like an AI/LLM-backed agent, used by the
    /// `TTPSelector`'s ATLAS-affinity bonus.
    #[must_use]
    pub fn is_ai_like(&self) -> bool {
        const AI_MARKERS: &[&str] = &["llm", "ai", "agent", "assistant", "chat", "gpt"];
        let haystack = format!(
            "{} {} {}",
            self.agent_type.to_lowercase(),
            self.capabilities.join(" ").to_lowercase(),
            self.domains.join(" ").to_lowercase()
        );
        AI_MARKERS.iter().any(|m| haystack.contains(m))
    }

    /// Numeric scale of `risk_level`, used by the `TTPSelector`'s risk bonus.
    #[must_use]
    pub fn risk_scale(&self) -> f64 {
        match self.risk_level.to_lowercase().as_str() {
            "low" => 1.0,
            "high" => 3.0,
            "critical" => 4.0,
            _ => 2.0, // medium and anything unrecognized
        }
    }
}

impl Default for TargetProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            platforms: Vec::new(),
            agent_type: default_agent_type(),
            risk_level: default_risk_level(),
            capabilities: Vec::new(),
            domains: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_profiler_contract() {
        let p = TargetProfile::default();
        assert_eq!(p.agent_type, "generic");
        assert_eq!(p.risk_level, "medium");
        assert!(p.platforms.is_empty());
    }

    #[test]
    fn is_ai_like_detects_markers() {
        let mut p = TargetProfile::default();
        p.agent_type = "chat-assistant".to_string();
        assert!(p.is_ai_like());
        let mut q = TargetProfile::default();
        q.agent_type = "database".to_string();
        assert!(!q.is_ai_like());
    }

    #[test]
    fn risk_scale_steps() {
        let mut p = TargetProfile::default();
        for (level, expected) in [
            ("low", 1.0),
            ("medium", 2.0),
            ("high", 3.0),
            ("critical", 4.0),
            ("unknown", 2.0),
        ] {
            p.risk_level = level.to_string();
            assert!((p.risk_scale() - expected).abs() < f64::EPSILON);
        }
    }
}
