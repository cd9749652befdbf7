//! The Evaluator Service Facade: the single externally-visible RPC surface.
//!
//! Wires an incoming [`EvaluatorRequest`] to a freshly constructed
//! [`Ecosystem`](crate::ecosystem::Ecosystem), runs it to completion, persists
//! its reports, and maps the result back to an [`EvaluatorResponse`]. Nothing
//! upstream of this module knows about axum; nothing downstream of it knows
//! about HTTP.

mod report;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use chrono::Utc;
use redforge_core::config::{
    CoverageReport, EvaluatorRequest, EvaluatorResponse, EvaluatorStatus, ReportFiles,
};
use redforge_core::model::{DualEvaluationResult, EvaluationMetrics};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::config::validate_request;
use crate::coverage::CoverageTracker;
use crate::ecosystem::Ecosystem;
use crate::error::{Error, Result};
use crate::generator::DefaultPayloadGenerator;
use crate::llm::StubGenerator;
use crate::observability::EventEmitter;
use crate::sandbox::UnavailableSandbox;
use crate::scenarios::build_scenario;
use crate::taxonomy::{BundledTaxonomyProvider, TaxonomyProvider};
use crate::transport::HttpTargetClient;

/// Startup-time configuration for one facade instance. Everything here is
/// resolved once from CLI flags and environment; nothing in it changes
/// while the facade is serving requests.
#[derive(Debug, Clone)]
pub struct FacadeOptions {
    pub host: String,
    pub port: u16,
    pub card_url: Option<String>,
    pub name_prefix: Option<String>,
    pub enable_generators: bool,
    pub report_dir: String,
}

impl FacadeOptions {
    fn advertised_url(&self) -> String {
        self.card_url
            .clone()
            .unwrap_or_else(|| format!("http://{}:{}", self.host, self.port))
    }

    fn advertised_name(&self) -> String {
        match &self.name_prefix {
            Some(prefix) => format!("{prefix}-redforge"),
            None => "redforge".to_string(),
        }
    }
}

struct FacadeState {
    options: FacadeOptions,
}

/// Hosts the Evaluator Service Facade's HTTP surface.
pub struct Facade {
    state: Arc<FacadeState>,
}

impl Facade {
    #[must_use]
    pub fn new(options: FacadeOptions) -> Self {
        Self {
            state: Arc::new(FacadeState { options }),
        }
    }

    fn router(&self) -> Router {
        Router::new()
            .route("/evaluate", post(evaluate_handler))
            .route("/healthz", get(healthz_handler))
            .route("/.well-known/agent-card.json", get(agent_card_handler))
            .with_state(Arc::clone(&self.state))
    }

    /// Binds `host:port` and serves until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the listener cannot bind.
    pub async fn serve(&self, cancel: CancellationToken) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.state.options.host, self.state.options.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid host/port: {e}")))?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "facade listening");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await?;
        Ok(())
    }
}

async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn agent_card_handler(State(state): State<Arc<FacadeState>>) -> impl IntoResponse {
    Json(json!({
        "name": state.options.advertised_name(),
        "description": "Adversarial security-evaluation engine for AI agent targets.",
        "url": state.options.advertised_url(),
    }))
}

async fn evaluate_handler(
    State(state): State<Arc<FacadeState>>,
    Json(request): Json<EvaluatorRequest>,
) -> impl IntoResponse {
    if let Err(err) = validate_request(&request) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": err.to_string()}))).into_response();
    }

    match handle_request(&state.options, request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "evaluation crashed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": err.to_string()}))).into_response()
        }
    }
}

async fn handle_request(options: &FacadeOptions, request: EvaluatorRequest) -> Result<EvaluatorResponse> {
    let start = Instant::now();
    let target = Arc::new(HttpTargetClient::new(request.participants.target.clone()));
    // Guaranteed `Some`: `validate_request` already checked the scenario name
    // against the same registry `build_scenario` consults.
    let scenario = build_scenario(&request.config.scenario)
        .expect("scenario already validated against the known registry");
    let taxonomy = Arc::new(BundledTaxonomyProvider);
    let generator = Arc::new(DefaultPayloadGenerator::new());
    let sandbox = Arc::new(UnavailableSandbox);
    let llm = if options.enable_generators {
        Some(Arc::new(StubGenerator::new()) as Arc<dyn crate::llm::Generator>)
    } else {
        None
    };

    let ecosystem = match Ecosystem::new(
        target,
        Arc::from(scenario),
        taxonomy.clone(),
        generator,
        sandbox,
        llm,
        request.config.clone(),
        EventEmitter::stderr(),
        CancellationToken::new(),
    ) {
        Ok(ecosystem) => ecosystem,
        Err(Error::Eval(err)) => return Ok(failed_response(&request, err.to_string(), start.elapsed().as_secs_f64())),
        Err(err) => return Err(err),
    };

    let result = ecosystem.evaluate().await;

    let coverage = if request.config.use_coverage_tracking {
        let mut tracker = CoverageTracker::new();
        tracker.observe(&result.attack_log);
        Some(tracker.report(taxonomy.name(), &taxonomy.all_techniques()))
    } else {
        None
    };

    let report_files = report::write_reports(&options.report_dir, &result)?;
    Ok(build_response(&result, coverage, Some(report_files)))
}

/// Builds the zeroed, status=`Failed` response for a request that validated
/// but could not even construct an `Ecosystem` (the sandbox-unavailable
/// boundary case). No target call is ever made on this path.
fn failed_response(request: &EvaluatorRequest, reason: String, duration_seconds: f64) -> EvaluatorResponse {
    tracing::warn!(reason, "evaluation failed before any target call");
    EvaluatorResponse {
        status: EvaluatorStatus::Failed,
        target_name: request.participants.target.clone(),
        scenario: request.config.scenario.clone(),
        metrics: EvaluationMetrics::zero(),
        evasions_found: 0,
        total_tests: 0,
        coverage: None,
        cost_usd: 0.0,
        duration_seconds,
        timestamp: Utc::now(),
        report_files: None,
    }
}

fn build_response(
    result: &DualEvaluationResult,
    coverage: Option<CoverageReport>,
    report_files: Option<ReportFiles>,
) -> EvaluatorResponse {
    let status = if result.cancelled {
        EvaluatorStatus::Cancelled
    } else {
        EvaluatorStatus::Completed
    };

    EvaluatorResponse {
        status,
        target_name: result.target_name.clone(),
        scenario: result.scenario.clone(),
        metrics: result.evaluator_assessment.metrics,
        evasions_found: result.target_assessment.vulnerabilities.len(),
        total_tests: result.result_log.len(),
        coverage,
        cost_usd: result.cost_usd,
        duration_seconds: result.total_time_seconds,
        timestamp: result.assessment_date,
        report_files,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redforge_core::config::{EvaluationConfig, ParticipantsConfig};

    fn options() -> FacadeOptions {
        FacadeOptions {
            host: "127.0.0.1".to_string(),
            port: 8080,
            card_url: None,
            name_prefix: None,
            enable_generators: false,
            report_dir: "reports".to_string(),
        }
    }

    #[test]
    fn advertised_url_defaults_to_host_port() {
        assert_eq!(options().advertised_url(), "http://127.0.0.1:8080");
    }

    #[test]
    fn advertised_url_honors_card_url_override() {
        let mut opts = options();
        opts.card_url = Some("https://evaluator.example.com".to_string());
        assert_eq!(opts.advertised_url(), "https://evaluator.example.com");
    }

    #[test]
    fn advertised_name_honors_prefix() {
        let mut opts = options();
        opts.name_prefix = Some("acme".to_string());
        assert_eq!(opts.advertised_name(), "acme-redforge");
    }

    #[tokio::test]
    async fn sandbox_unavailable_request_yields_failed_status_not_http_error() {
        let request = EvaluatorRequest {
            participants: ParticipantsConfig {
                target: "http://localhost:9000".to_string(),
            },
            config: EvaluationConfig {
                scenario: "prompt_injection".to_string(),
                use_sandbox: true,
                budget_usd: 0.0,
                ..EvaluationConfig::default()
            },
        };
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options();
        opts.report_dir = dir.path().to_str().unwrap().to_string();

        let response = handle_request(&opts, request).await.unwrap();
        assert_eq!(response.status, EvaluatorStatus::Failed);
        assert_eq!(response.total_tests, 0);
        assert!(response.report_files.is_none());
    }
}
