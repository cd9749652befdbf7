use std::sync::Arc;

use redforge_core::model::Attack;
use serde_json::json;

use super::{Agent, AgentContext};
use crate::llm::Generator;

/// Produces semantic-preserving variants of recent `Attack` payloads.
///
/// `step` always applies a deterministic lexical transform so mutation is
/// reproducible under a fixed seed regardless of configuration. When an
/// [`llm::Generator`](crate::llm::Generator) is configured, the ecosystem
/// scheduler additionally calls [`Mutator::refine_async`] per mutated
/// attack to paraphrase the payload text through it; that call is async
/// and accounted against the budget, so it lives outside the synchronous
/// `Agent::step` contract.
pub struct Mutator {
    llm: Option<Arc<dyn Generator>>,
}

impl Mutator {
    #[must_use]
    pub fn new() -> Self {
        Self { llm: None }
    }

    #[must_use]
    pub fn with_llm(llm: Arc<dyn Generator>) -> Self {
        Self { llm: Some(llm) }
    }

    #[must_use]
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Paraphrases `text` through the configured LLM collaborator, falling
    /// back to the input unchanged when none is configured. Returns the
    /// cost incurred alongside the text so the caller can charge it.
    pub async fn refine_async(&self, text: &str) -> (String, f64) {
        match &self.llm {
            Some(llm) => {
                let completion = llm.complete(text).await;
                (completion.text, completion.cost_usd)
            }
            None => (text.to_string(), 0.0),
        }
    }

    fn mutate_text(text: &str) -> String {
        format!("{text} (rephrased to evade keyword filters)")
    }
}

impl Default for Mutator {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for Mutator {
    fn id(&self) -> &str {
        "mutator"
    }

    fn step(&self, ctx: &AgentContext<'_>) -> Vec<Attack> {
        ctx.snapshot
            .attacks()
            .iter()
            .filter(|a| a.scenario == ctx.scenario.name())
            .enumerate()
            .map(|(i, source)| {
                let mutated_text = source
                    .payload
                    .as_str()
                    .map(Self::mutate_text)
                    .unwrap_or_else(|| Self::mutate_text(&source.payload.to_string()));

                let attack_id = format!(
                    "{}-r{}-{}-{}-{}",
                    ctx.scenario.name(),
                    ctx.round,
                    self.id(),
                    source.technique_id,
                    i
                );

                Attack::new(
                    attack_id,
                    ctx.scenario.name(),
                    source.technique_id.clone(),
                    source.technique_name.clone(),
                    json!(mutated_text),
                    source.is_malicious,
                    source.severity,
                )
                .with_metadata("mitre_technique_id", json!(source.technique_id))
                .with_metadata("source_agent", json!(self.id()))
                .with_metadata("mutated_from", json!(source.attack_id))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::DefaultPayloadGenerator;
    use crate::knowledge_base::KnowledgeBase;
    use crate::llm::StubGenerator;
    use crate::scenarios::{PromptInjectionScenario, Scenario};
    use redforge_core::model::Severity;

    fn ctx_with_seed_attack<'a>(
        scenario: &'a PromptInjectionScenario,
        techniques: &'a [redforge_core::model::Technique],
        generator: &'a DefaultPayloadGenerator,
        kb: &KnowledgeBase,
    ) -> crate::knowledge_base::KnowledgeBaseSnapshot {
        kb.append_attack(Attack::new(
            "seed-1",
            scenario.name(),
            techniques[0].technique_id.clone(),
            techniques[0].name.clone(),
            json!("original payload"),
            true,
            Severity::Medium,
        ))
        .unwrap();
        let _ = generator;
        kb.snapshot()
    }

    #[test]
    fn preserves_is_malicious_and_tags_lineage() {
        let scenario = PromptInjectionScenario;
        let generator = DefaultPayloadGenerator::new();
        let techniques = scenario.techniques();
        let kb = KnowledgeBase::new();
        let snapshot = ctx_with_seed_attack(&scenario, &techniques, &generator, &kb);
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
        let attacks = Mutator::new().step(&ctx);
        assert_eq!(attacks.len(), 1);
        assert!(attacks[0].is_malicious);
        assert_eq!(attacks[0].metadata["mutated_from"], json!("seed-1"));
    }

    #[tokio::test]
    async fn refine_async_without_llm_is_identity_and_free() {
        let mutator = Mutator::new();
        let (text, cost) = mutator.refine_async("hello").await;
        assert_eq!(text, "hello");
        assert_eq!(cost, 0.0);
    }

    #[tokio::test]
    async fn refine_async_with_llm_charges_configured_cost() {
        let mutator = Mutator::with_llm(Arc::new(StubGenerator::with_cost(0.01)));
        let (text, cost) = mutator.refine_async("hello").await;
        assert!(text.contains("hello"));
        assert!((cost - 0.01).abs() < f64::EPSILON);
    }
}
