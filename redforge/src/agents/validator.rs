use std::collections::HashSet;

use redforge_core::model::Attack;
use sha2::{Digest, Sha256};

use super::{Agent, AgentContext};

/// Rejects degenerate, duplicate, or syntactically invalid `Attack`s before
/// they reach execution. Produces no new `Attack`s of its own — it tags
/// survivors `validated` on the shared `KnowledgeBase` and reports what it
/// dropped via its return value being empty.
pub struct Validator;

impl Validator {
    fn payload_hash(attack: &Attack) -> String {
        let mut hasher = Sha256::new();
        hasher.update(attack.technique_id.as_bytes());
        hasher.update(attack.payload.to_string().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn is_well_formed(attack: &Attack) -> bool {
        let has_text = match &attack.payload {
            serde_json::Value::String(s) => !s.trim().is_empty(),
            serde_json::Value::Null => false,
            _ => true,
        };
        has_text && !attack.technique_id.is_empty() && !attack.attack_id.is_empty()
    }

    /// Runs the validation pass against the round's candidate `Attack`s,
    /// tagging each surviving one `validated` on `kb` and returning the
    /// ids that were dropped (duplicate-by-payload-hash or malformed).
    pub fn validate(
        &self,
        kb: &crate::knowledge_base::KnowledgeBase,
        candidates: &[Attack],
    ) -> Vec<String> {
        let mut seen_hashes = HashSet::new();
        let mut dropped = Vec::new();

        for attack in candidates {
            let hash = Self::payload_hash(attack);
            if !Self::is_well_formed(attack) || !seen_hashes.insert(hash) {
                dropped.push(attack.attack_id.clone());
                continue;
            }
            kb.tag_attack(&attack.attack_id, "validated");
        }

        dropped
    }
}

impl Agent for Validator {
    fn id(&self) -> &str {
        "validator"
    }

    /// The `Validator` never introduces new `Attack`s; validation happens
    /// via [`Validator::validate`], called by the scheduler against the
    /// round's freshly-generated candidates before they are appended to the
    /// shared `KnowledgeBase`.
    fn step(&self, _ctx: &AgentContext<'_>) -> Vec<Attack> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge_base::KnowledgeBase;
    use redforge_core::model::Severity;
    use serde_json::json;

    fn attack(id: &str, technique: &str, payload: &str) -> Attack {
        Attack::new(
            id,
            "prompt_injection",
            technique,
            "Direct Injection",
            json!(payload),
            true,
            Severity::Medium,
        )
    }

    #[test]
    fn drops_duplicate_payload_hash() {
        let kb = KnowledgeBase::new();
        let candidates = vec![
            attack("a1", "T1", "same text"),
            attack("a2", "T1", "same text"),
        ];
        for a in &candidates {
            kb.append_attack(a.clone()).unwrap();
        }
        let dropped = Validator.validate(&kb, &candidates);
        assert_eq!(dropped, vec!["a2".to_string()]);
        assert_eq!(kb.by_tag_attacks("validated").len(), 1);
    }

    #[test]
    fn drops_empty_payload() {
        let kb = KnowledgeBase::new();
        let candidates = vec![attack("a1", "T1", "")];
        kb.append_attack(candidates[0].clone()).unwrap();
        let dropped = Validator.validate(&kb, &candidates);
        assert_eq!(dropped, vec!["a1".to_string()]);
    }

    #[test]
    fn step_never_creates_attacks() {
        let validator = Validator;
        assert_eq!(validator.id(), "validator");
    }
}
