use redforge_core::model::{Attack, Severity};
use serde_json::json;

use super::{Agent, AgentContext};

/// Reads the target profile's selected techniques and emits one
/// conservative seed `Attack` per technique, establishing baseline
/// coverage before any specialization happens.
pub struct BoundaryProber;

impl Agent for BoundaryProber {
    fn id(&self) -> &str {
        "boundary_prober"
    }

    fn step(&self, ctx: &AgentContext<'_>) -> Vec<Attack> {
        ctx.techniques
            .iter()
            .map(|technique| {
                let payloads = ctx.generator.generate(technique, 1, false, ctx.seed);
                let payload = payloads.into_iter().next();
                let (text, is_malicious) = payload
                    .map(|p| (p.text, p.is_malicious))
                    .unwrap_or_else(|| (format!("Probe: {}", technique.name), true));

                let attack_id = format!(
                    "{}-r{}-{}-{}",
                    ctx.scenario.name(),
                    ctx.round,
                    self.id(),
                    technique.technique_id
                );

                Attack::new(
                    attack_id,
                    ctx.scenario.name(),
                    technique.technique_id.clone(),
                    technique.name.clone(),
                    json!(text),
                    is_malicious,
                    Severity::Medium,
                )
                .with_metadata("mitre_technique_id", json!(technique.technique_id))
                .with_metadata("source_agent", json!(self.id()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DefaultPayloadGenerator;
    use crate::knowledge_base::KnowledgeBase;
    use crate::scenarios::{PromptInjectionScenario, Scenario};

    #[test]
    fn emits_one_attack_per_technique() {
        let scenario = PromptInjectionScenario;
        let generator = DefaultPayloadGenerator::new();
        let techniques = scenario.techniques();
        let kb = KnowledgeBase::new();
        let snapshot = kb.snapshot();
        let allocations = std::collections::HashMap::new();
        let ctx = AgentContext {
            snapshot: &snapshot,
            techniques: &techniques,
            scenario: &scenario,
            generator: &generator,
            allocations: &allocations,
            seed: 1,
            round: 1,
        };
        let attacks = BoundaryProber.step(&ctx);
        assert_eq!(attacks.len(), techniques.len());
    }
}
