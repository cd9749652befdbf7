use redforge_core::model::{Attack, Severity};
use serde_json::json;

use super::{Agent, AgentContext};

/// Reads the techniques a `BoundaryProber` already seeded and asks the
/// `PayloadGenerator` for harder, higher-volume variants of each — the
/// round's escalation step.
pub struct Exploiter;

impl Agent for Exploiter {
    fn id(&self) -> &str {
        "exploiter"
    }

    fn step(&self, ctx: &AgentContext<'_>) -> Vec<Attack> {
        let seeded: std::collections::HashSet<&str> = ctx
            .snapshot
            .attacks()
            .iter()
            .map(|a| a.technique_id.as_str())
            .collect();

        ctx.techniques
            .iter()
            .filter(|t| seeded.contains(t.technique_id.as_str()))
            .flat_map(|technique| {
                let payloads = ctx.generator.generate(
                    technique,
                    ctx.allocation_for(&technique.technique_id),
                    false,
                    ctx.seed.wrapping_add(1),
                );

                payloads.into_iter().enumerate().map(move |(i, payload)| {
                    let attack_id = format!(
                        "{}-r{}-{}-{}-{}",
                        ctx.scenario.name(),
                        ctx.round,
                        self.id(),
                        technique.technique_id,
                        i
                    );

                    Attack::new(
                        attack_id,
                        ctx.scenario.name(),
                        technique.technique_id.clone(),
                        technique.name.clone(),
                        json!(payload.text),
                        payload.is_malicious,
                        Severity::High,
                    )
                    .with_metadata("mitre_technique_id", json!(technique.technique_id))
                    .with_metadata("source_agent", json!(self.id()))
                    .with_metadata("fallback", json!(payload.fallback))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::generator::DefaultPayloadGenerator;
    use crate::knowledge_base::KnowledgeBase;
    use crate::scenarios::{PromptInjectionScenario, Scenario};

    #[test]
    fn only_escalates_techniques_already_seeded() {
        let scenario = PromptInjectionScenario;
        let generator = DefaultPayloadGenerator::new();
        let techniques = scenario.techniques();
        let kb = KnowledgeBase::new();
        kb.append_attack(Attack::new(
            "seed-1",
            scenario.name(),
            techniques[0].technique_id.clone(),
            techniques[0].name.clone(),
            json!("seed payload"),
            true,
            Severity::Medium,
        ))
        .unwrap();
        let snapshot = kb.snapshot();
        let allocations = [(techniques[0].technique_id.clone(), 2)].into_iter().collect();
        let ctx = AgentContext {
            snapshot: &snapshot,
            techniques: &techniques,
            scenario: &scenario,
            generator: &generator,
            allocations: &allocations,
            seed: 1,
            round: 1,
        };
        let attacks = Exploiter.step(&ctx);
        assert_eq!(attacks.len(), 2);
        assert!(
            attacks
                .iter()
                .all(|a| a.technique_id == techniques[0].technique_id)
        );
    }

    #[test]
    fn emits_nothing_when_nothing_seeded() {
        let scenario = PromptInjectionScenario;
        let generator = DefaultPayloadGenerator::new();
        let techniques = scenario.techniques();
        let kb = KnowledgeBase::new();
        let snapshot = kb.snapshot();
        let allocations = HashMap::new();
        let ctx = AgentContext {
            snapshot: &snapshot,
            techniques: &techniques,
            scenario: &scenario,
            generator: &generator,
            allocations: &allocations,
            seed: 1,
            round: 1,
        };
        assert!(Exploiter.step(&ctx).is_empty());
    }
}
