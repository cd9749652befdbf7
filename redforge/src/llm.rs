//! The opaque, cost-accounting LLM `Generator` collaborator.
//!
//! Real inference providers are out of scope; this module ships the trait
//! seam plus a deterministic stub so `Mutator` and `Judge` have something
//! to call in tests and in offline runs. A real provider plugs in by
//! implementing [`Generator`].

use async_trait::async_trait;

/// One completion from a `Generator`, with the cost it incurred.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub cost_usd: f64,
}

/// An opaque LLM-backed collaborator used by `Mutator` (to paraphrase
/// attacks) and `Judge` (to label ambiguous results). Every call has an
/// accounted cost so the scheduler can enforce `budget_usd`.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn complete(&self, prompt: &str) -> Completion;

    /// Fixed cost charged per call, consulted by the scheduler before
    /// issuing a call so it can stop before exceeding budget.
    fn cost_per_call(&self) -> f64;
}

/// Deterministic stand-in: "paraphrases" by a fixed lexical transform
/// rather than calling out to a model. Has zero cost by default so the
/// crate is runnable without a configured budget; construct with
/// [`StubGenerator::with_cost`] to exercise budget-exhaustion paths.
pub struct StubGenerator {
    cost_usd: f64,
}

impl StubGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self { cost_usd: 0.0 }
    }

    #[must_use]
    pub fn with_cost(cost_usd: f64) -> Self {
        Self { cost_usd }
    }
}

impl Default for StubGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Generator for StubGenerator {
    async fn complete(&self, prompt: &str) -> Completion {
        Completion {
            text: format!("Rephrased: {prompt}"),
            cost_usd: self.cost_usd,
        }
    }

    fn cost_per_call(&self) -> f64 {
        self.cost_usd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stub_generator_is_deterministic() {
        let generator = StubGenerator::new();
        let a = generator.complete("hello").await;
        let b = generator.complete("hello").await;
        assert_eq!(a.text, b.text);
    }

    #[tokio::test]
    async fn with_cost_charges_the_configured_amount() {
        let generator = StubGenerator::with_cost(0.02);
        let completion = generator.complete("hi").await;
        assert!((completion.cost_usd - 0.02).abs() < f64::EPSILON);
    }
}
