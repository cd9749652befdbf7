//! The `Ecosystem`/Scheduler: the round state machine that drives one
//! `evaluate()` call end to end — `PROFILE → SELECT_TTPS → PLAN → GENERATE
//! → VALIDATE → EXECUTE → SCORE_ROUND → DECIDE_NEXT`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use redforge_core::config::{EvaluationConfig, EvaluatorStatus};
use redforge_core::model::{Attack, DualEvaluationResult, Outcome, TargetProfile, TestResult};
use serde_json::json;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::agents::{Agent, AgentContext, BoundaryProber, Exploiter, Judge, Mutator, Validator};
use crate::error::{Error, Result};
use crate::generator::PayloadGenerator;
use crate::knowledge_base::KnowledgeBase;
use crate::llm::Generator;
use crate::observability::{Event, EventEmitter, metrics};
use crate::planner::{AdaptivePlanner, PlannerOutcome, WEAK_THRESHOLD};
use crate::profiler::profile_from_agent_card;
use crate::sandbox::Sandbox;
use crate::scenarios::Scenario;
use crate::scoring::ScoringEngine;
use crate::taxonomy::{TaxonomyProvider, TtpSelector};
use crate::transport::TargetClient;

/// Generalizes the original's `remaining_budget > 20` validation-phase gate
/// to a configurable threshold; 20 keeps the original's own default.
const DEFAULT_VALIDATION_MINIMUM: f64 = 20.0;
/// Hard per-call outbound timeout; a call that exceeds this is treated as a
/// timeout rather than routed through the scenario oracle.
const TARGET_CALL_TIMEOUT: Duration = Duration::from_secs(30);
/// Default bounded I/O fan-out per round.
const DEFAULT_FAN_OUT: usize = 8;

/// Wires together every collaborator one evaluation needs and drives the
/// round state machine to completion, cancellation, or budget exhaustion.
pub struct Ecosystem {
    target: Arc<dyn TargetClient>,
    scenario: Arc<dyn Scenario>,
    taxonomy: Arc<dyn TaxonomyProvider>,
    generator: Arc<dyn PayloadGenerator>,
    sandbox: Arc<dyn Sandbox>,
    llm: Option<Arc<dyn Generator>>,
    config: EvaluationConfig,
    emitter: EventEmitter,
    cancel: CancellationToken,
    fan_out: usize,
}

impl std::fmt::Debug for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ecosystem")
            .field("config", &self.config)
            .field("fan_out", &self.fan_out)
            .finish_non_exhaustive()
    }
}

impl Ecosystem {
    /// # Errors
    /// Returns `Error::Eval(Validation)` if `config.use_sandbox` is set but
    /// `sandbox.is_available()` is false — checked before any target call.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        target: Arc<dyn TargetClient>,
        scenario: Arc<dyn Scenario>,
        taxonomy: Arc<dyn TaxonomyProvider>,
        generator: Arc<dyn PayloadGenerator>,
        sandbox: Arc<dyn Sandbox>,
        llm: Option<Arc<dyn Generator>>,
        config: EvaluationConfig,
        emitter: EventEmitter,
        cancel: CancellationToken,
    ) -> Result<Self> {
        if config.use_sandbox && !sandbox.is_available() {
            return Err(Error::Eval(redforge_core::Error::Validation(
                "use_sandbox is set but no sandbox isolation primitive is available".to_string(),
            )));
        }
        Ok(Self {
            target,
            scenario,
            taxonomy,
            generator,
            sandbox,
            llm,
            config,
            emitter,
            cancel,
            fan_out: DEFAULT_FAN_OUT,
        })
    }

    #[must_use]
    pub fn with_fan_out(mut self, fan_out: usize) -> Self {
        self.fan_out = fan_out.max(1);
        self
    }

    /// Runs the full evaluation: profiles the target, selects techniques,
    /// then iterates the round state machine until the planner stops,
    /// cancellation is observed, or the budget is exhausted.
    pub async fn evaluate(&self) -> DualEvaluationResult {
        let start = Instant::now();
        let kb = KnowledgeBase::new();
        let evaluation_id = format!(
            "eval-{}-{}",
            self.scenario.name(),
            self.config.random_seed.unwrap_or(0)
        );

        let card = self.target.fetch_agent_card().await.ok();
        let profile = card
            .as_ref()
            .map_or_else(TargetProfile::default, profile_from_agent_card);
        let target_name = profile.name.clone();

        self.emitter.emit(Event::EvaluationStarted {
            timestamp: Utc::now(),
            evaluation_id: evaluation_id.clone(),
            target_name: target_name.clone(),
            scenario: self.scenario.name().to_string(),
        });

        let (cancelled, cost_usd) = if self.config.budget_usd <= 0.0 {
            (false, 0.0)
        } else {
            self.run_rounds(&kb, &profile, &target_name).await
        };

        let result = self.finalize(&evaluation_id, &target_name, &kb, start, cancelled, cost_usd);
        self.emit_finished(&evaluation_id, &result);
        result
    }

    async fn run_rounds(
        &self,
        kb: &KnowledgeBase,
        profile: &TargetProfile,
        target_name: &str,
    ) -> (bool, f64) {
        let scenario_techniques = self.scenario.techniques();
        let selected = TtpSelector::select(profile, &scenario_techniques, scenario_techniques.len());
        let categories: Vec<String> = selected.iter().map(|t| t.technique_id.clone()).collect();

        let mut planner = AdaptivePlanner::new(DEFAULT_VALIDATION_MINIMUM);
        let mut cost_usd = 0.0_f64;
        let mut round = 1usize;
        let mut cancelled = false;

        let prober = BoundaryProber;
        let exploiter = Exploiter;
        let mutator = Mutator::new();
        let validator = Validator;
        let judge = match &self.llm {
            Some(llm) => Judge::with_llm(Arc::clone(llm)),
            None => Judge::new(),
        };

        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let round_start = Instant::now();
            let per_category_f1 = self.per_category_f1(kb, &categories);
            let overall_f1 = self.overall_f1(kb);
            let remaining_budget = (self.config.budget_usd - cost_usd).max(0.0);
            let budget_exhausted = remaining_budget <= 0.0;

            let outcome = planner.decide(
                round,
                self.config.max_rounds,
                budget_exhausted,
                remaining_budget,
                &categories,
                &per_category_f1,
                overall_f1,
            );

            let plan = match outcome {
                PlannerOutcome::Stop(_) => break,
                PlannerOutcome::Continue(plan) => plan,
            };

            if let Some(log) = planner.decisions().last() {
                self.emitter.emit(Event::PlannerDecision {
                    timestamp: log.timestamp,
                    round: log.round,
                    decision_kind: log.decision_kind.clone(),
                    choice: log.choice.clone(),
                    reasoning: log.reasoning.clone(),
                });
            }

            self.emitter.emit(Event::RoundStarted {
                timestamp: Utc::now(),
                round,
                phase: format!("{:?}", plan.phase),
            });
            metrics::record_round(self.scenario.name());
            metrics::set_current_phase(&format!("{:?}", plan.phase), None);

            let allocations: HashMap<String, usize> =
                plan.allocations.iter().map(|a| (a.category.clone(), a.count.max(1))).collect();

            let candidates = self
                .generate(
                    kb,
                    &selected,
                    &allocations,
                    round,
                    &prober,
                    &exploiter,
                    &mutator,
                    &mut cost_usd,
                )
                .await;

            for candidate in candidates {
                if let Err(Error::Eval(redforge_core::Error::Duplicate { kind, id })) =
                    kb.append_attack(candidate)
                {
                    self.emitter.emit(Event::DuplicateRejected {
                        timestamp: Utc::now(),
                        kind,
                        id,
                    });
                }
            }

            let snapshot = kb.snapshot();
            let validated_ids: std::collections::HashSet<String> = snapshot
                .by_tag_attacks("validated")
                .into_iter()
                .map(|a| a.attack_id.clone())
                .collect();
            let unvalidated: Vec<Attack> = snapshot
                .attacks()
                .into_iter()
                .filter(|a| !validated_ids.contains(&a.attack_id))
                .cloned()
                .collect();
            validator.validate(kb, &unvalidated);

            let already_tested: std::collections::HashSet<String> =
                kb.snapshot().results().into_iter().map(|r| r.attack_id.clone()).collect();
            let to_execute: Vec<Attack> = kb
                .snapshot()
                .by_tag_attacks("validated")
                .into_iter()
                .filter(|a| !already_tested.contains(&a.attack_id))
                .cloned()
                .collect();

            let executed = self
                .execute_round(&to_execute, target_name, &judge, &mut cost_usd, &mut cancelled)
                .await;
            for result in executed {
                let _ = kb.append_result(result);
            }

            let round_f1 = self.overall_f1(kb);
            self.update_coverage_metric(kb);
            let weak_count = per_category_f1.values().filter(|f| **f < WEAK_THRESHOLD).count();
            self.emitter.emit(Event::RoundFinished {
                timestamp: Utc::now(),
                round,
                f1: round_f1,
                weak_categories: weak_count,
            });
            metrics::record_round_duration(round_start.elapsed());
            metrics::set_cost(cost_usd);

            if cancelled {
                break;
            }
            round += 1;
        }

        (cancelled, cost_usd)
    }

    #[allow(clippy::too_many_arguments)]
    async fn generate(
        &self,
        kb: &KnowledgeBase,
        selected: &[redforge_core::model::Technique],
        allocations: &HashMap<String, usize>,
        round: usize,
        prober: &BoundaryProber,
        exploiter: &Exploiter,
        mutator: &Mutator,
        cost_usd: &mut f64,
    ) -> Vec<Attack> {
        let base_seed = self.config.random_seed.unwrap_or(0);
        let mut candidates = Vec::new();

        let snapshot = kb.snapshot();
        for i in 0..self.config.num_boundary_probers.max(1) {
            let ctx = AgentContext {
                snapshot: &snapshot,
                techniques: selected,
                scenario: self.scenario.as_ref(),
                generator: self.generator.as_ref(),
                allocations,
                seed: base_seed.wrapping_add(i as u64),
                round,
            };
            candidates.extend(prober.step(&ctx));
        }
        for candidate in &candidates {
            let _ = kb.append_attack(candidate.clone());
        }

        let snapshot = kb.snapshot();
        let mut exploiter_out = Vec::new();
        for i in 0..self.config.num_exploiters.max(1) {
            let ctx = AgentContext {
                snapshot: &snapshot,
                techniques: selected,
                scenario: self.scenario.as_ref(),
                generator: self.generator.as_ref(),
                allocations,
                seed: base_seed.wrapping_add(100 + i as u64),
                round,
            };
            exploiter_out.extend(exploiter.step(&ctx));
        }
        for candidate in &exploiter_out {
            let _ = kb.append_attack(candidate.clone());
        }
        candidates.extend(exploiter_out);

        let snapshot = kb.snapshot();
        let mut mutator_out = Vec::new();
        for i in 0..self.config.num_mutators.max(1) {
            let ctx = AgentContext {
                snapshot: &snapshot,
                techniques: selected,
                scenario: self.scenario.as_ref(),
                generator: self.generator.as_ref(),
                allocations,
                seed: base_seed.wrapping_add(200 + i as u64),
                round,
            };
            mutator_out.extend(mutator.step(&ctx));
        }

        if let Some(llm) = &self.llm {
            for attack in &mut mutator_out {
                let remaining = (self.config.budget_usd - *cost_usd).max(0.0);
                if remaining < llm.cost_per_call() {
                    break;
                }
                let text = attack.payload.as_str().unwrap_or_default().to_string();
                let (refined, call_cost) = mutator.refine_async(&text).await;
                attack.payload = json!(refined);
                *cost_usd += call_cost;
            }
        }
        candidates.extend(mutator_out);
        candidates.extend(self.benign_probe_attacks(round));

        candidates
    }

    /// Builds this round's benign, non-malicious probes from the scenario's
    /// fixed list — the only source of `FalsePositive`/`TrueNegative`
    /// outcomes, since every agent-generated candidate is malicious.
    fn benign_probe_attacks(&self, round: usize) -> Vec<Attack> {
        self.scenario
            .benign_probes()
            .into_iter()
            .enumerate()
            .map(|(i, probe)| {
                let attack_id =
                    format!("{}-r{}-benign_probe-{}-{i}", self.scenario.name(), round, probe.technique_id);
                Attack::new(
                    attack_id,
                    self.scenario.name(),
                    probe.technique_id,
                    probe.technique_name,
                    json!(probe.payload),
                    false,
                    redforge_core::model::Severity::Low,
                )
                .with_metadata("source_agent", json!("benign_probe"))
            })
            .collect()
    }

    /// Labels one executed attack, escalating to the LLM-based
    /// [`Judge::label_async`] when an LLM is configured and the response
    /// is ambiguous under the rule-based oracle; falls back to
    /// [`Judge::result_for`] otherwise (no LLM configured, an unambiguous
    /// response, or insufficient remaining budget for the call).
    async fn judge_response(
        &self,
        judge: &Judge,
        attack: &Attack,
        target_name: &str,
        response: Option<&crate::transport::TargetResponse>,
        cost_usd: &mut f64,
    ) -> TestResult {
        let remaining = (self.config.budget_usd - *cost_usd).max(0.0);
        let should_adjudicate = self
            .llm
            .as_ref()
            .is_some_and(|llm| Judge::is_ambiguous(response) && remaining >= llm.cost_per_call());

        if should_adjudicate {
            let (detected, confidence, call_cost) =
                judge.label_async(self.scenario.as_ref(), attack, response).await;
            *cost_usd += call_cost;
            let reason = if detected {
                "llm adjudicated: blocked".to_string()
            } else {
                "llm adjudicated: target completed the action".to_string()
            };
            let mut result = TestResult::new(
                format!("{}-result", attack.attack_id),
                attack.attack_id.clone(),
                target_name,
                detected,
                confidence,
                attack.is_malicious,
                reason,
                Utc::now(),
            );
            result.outcome = Outcome::compute(detected, attack.is_malicious);
            result
        } else {
            Judge::result_for(self.scenario.as_ref(), attack, target_name, response, Utc::now())
        }
    }

    async fn execute_round(
        &self,
        attacks: &[Attack],
        target_name: &str,
        judge: &Judge,
        cost_usd: &mut f64,
        cancelled: &mut bool,
    ) -> Vec<TestResult> {
        let semaphore = Arc::new(Semaphore::new(self.fan_out));
        let mut handles = Vec::new();

        for attack in attacks {
            if self.cancel.is_cancelled() {
                *cancelled = true;
                break;
            }
            let target = Arc::clone(&self.target);
            let sem = Arc::clone(&semaphore);
            let attack = attack.clone();
            handles.push(tokio::spawn(async move {
                let _permit = sem.acquire_owned().await.ok();
                let command = json!({
                    "command": attack.payload,
                    "parameters": {
                        "attack_id": attack.attack_id,
                        "technique": attack.technique_id,
                        "scenario": attack.scenario,
                    },
                });
                let call_start = Instant::now();
                let outcome = tokio::time::timeout(TARGET_CALL_TIMEOUT, target.send_attack(command)).await;
                (attack, outcome, call_start.elapsed())
            }));
        }

        let mut results = Vec::new();
        for handle in handles {
            let Ok((attack, outcome, duration)) = handle.await else {
                continue;
            };
            metrics::record_target_call_duration(duration);

            let result = match outcome {
                Ok(Ok(response)) => {
                    self.judge_response(judge, &attack, target_name, response.as_ref(), cost_usd).await
                }
                Ok(Err(_)) | Err(_) => {
                    let mut r = TestResult::new(
                        format!("{}-result", attack.attack_id),
                        attack.attack_id.clone(),
                        target_name,
                        false,
                        1.0,
                        attack.is_malicious,
                        "outbound call timed out or failed",
                        Utc::now(),
                    );
                    r.outcome = Outcome::compute(false, attack.is_malicious);
                    r
                }
            };

            self.emitter.emit(Event::AttackExecuted {
                timestamp: Utc::now(),
                attack_id: attack.attack_id.clone(),
                technique_id: attack.technique_id.clone(),
                detected: result.detected,
                #[allow(clippy::cast_possible_truncation)]
                duration_ms: duration.as_millis() as u64,
            });
            metrics::record_test(self.scenario.name(), result.detected);
            results.push(result);
        }
        results
    }

    fn per_category_f1(&self, kb: &KnowledgeBase, categories: &[String]) -> HashMap<String, f64> {
        let snapshot = kb.snapshot();
        let attacks_by_id: HashMap<&str, &Attack> =
            snapshot.attacks().into_iter().map(|a| (a.attack_id.as_str(), a)).collect();

        let mut per_category: HashMap<String, Vec<TestResult>> = HashMap::new();
        for result in snapshot.results() {
            if let Some(attack) = attacks_by_id.get(result.attack_id.as_str()) {
                per_category.entry(attack.technique_id.clone()).or_default().push(result.clone());
            }
        }

        categories
            .iter()
            .filter_map(|category| {
                let results = per_category.get(category)?;
                Some((category.clone(), ScoringEngine::evaluator_assessment(results).metrics.f1))
            })
            .collect()
    }

    fn overall_f1(&self, kb: &KnowledgeBase) -> f64 {
        let snapshot = kb.snapshot();
        let results: Vec<TestResult> = snapshot.results().into_iter().cloned().collect();
        ScoringEngine::evaluator_assessment(&results).metrics.f1
    }

    fn update_coverage_metric(&self, kb: &KnowledgeBase) {
        if !self.config.use_coverage_tracking {
            return;
        }
        let total = self.taxonomy.all_techniques().len().max(1);
        let exercised: std::collections::HashSet<String> =
            kb.snapshot().attacks().into_iter().map(|a| a.technique_id.clone()).collect();
        #[allow(clippy::cast_precision_loss)]
        let ratio = exercised.len() as f64 / total as f64;
        metrics::set_coverage_ratio(ratio);
    }

    fn finalize(
        &self,
        evaluation_id: &str,
        target_name: &str,
        kb: &KnowledgeBase,
        start: Instant,
        cancelled: bool,
        cost_usd: f64,
    ) -> DualEvaluationResult {
        let snapshot = kb.snapshot();
        let attacks: Vec<Attack> = snapshot.attacks().into_iter().cloned().collect();
        let results: Vec<TestResult> = snapshot.results().into_iter().cloned().collect();

        let evaluator_assessment = ScoringEngine::evaluator_assessment(&results);
        let target_assessment = ScoringEngine::target_assessment(&attacks, &results);

        DualEvaluationResult {
            evaluation_id: evaluation_id.to_string(),
            scenario: self.scenario.name().to_string(),
            target_name: target_name.to_string(),
            assessment_date: Utc::now(),
            total_time_seconds: start.elapsed().as_secs_f64(),
            evaluator_assessment,
            target_assessment,
            attack_log: attacks,
            result_log: results,
            cancelled,
            cost_usd,
        }
    }

    fn emit_finished(&self, evaluation_id: &str, result: &DualEvaluationResult) {
        let status = if result.cancelled {
            EvaluatorStatus::Cancelled
        } else {
            EvaluatorStatus::Completed
        };
        self.emitter.emit(Event::EvaluationFinished {
            timestamp: Utc::now(),
            evaluation_id: evaluation_id.to_string(),
            status: format!("{status:?}"),
            total_tests: result.result_log.len(),
        });
    }
}
