//! Metrics collection.
//!
//! Prometheus-compatible metrics with label cardinality protection and
//! typed convenience functions for recording measurements about rounds,
//! attacks, and cost.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::error::Error;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Known scenario names used for label cardinality protection. Any name not
/// in this list is bucketed as `"__unknown__"` to prevent unbounded label
/// growth from a facade request's `scenario` field.
const KNOWN_SCENARIOS: [&str; 2] = ["prompt_injection", "comprehensive_security"];

/// Sanitizes a scenario name for use as a metrics label.
#[must_use]
pub fn sanitize_scenario_label(scenario: &str) -> &str {
    if KNOWN_SCENARIOS.contains(&scenario) {
        scenario
    } else {
        "__unknown__"
    }
}

/// Initializes the global metrics recorder.
///
/// When `port` is `Some`, a Prometheus HTTP listener is started on
/// `127.0.0.1:<port>`. When `None`, the recorder is installed without an
/// HTTP endpoint.
///
/// # Errors
/// Returns `Error::Fatal` if the recorder or HTTP listener cannot be
/// installed (e.g. port already in use).
pub fn init_metrics(port: Option<u16>) -> Result<(), Error> {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        tracing::debug!("metrics already initialized, skipping");
        return Ok(());
    }
    port.map_or_else(
        || PrometheusBuilder::new().install_recorder().map(|_| ()),
        |p| {
            PrometheusBuilder::new()
                .with_http_listener(([127, 0, 0, 1], p))
                .install()
        },
    )
    .map_err(|e| Error::Fatal(e.to_string()))?;

    describe_metrics();
    Ok(())
}

fn describe_metrics() {
    describe_counter!("redforge_rounds_total", "Total number of evaluation rounds run");
    describe_counter!("redforge_attacks_total", "Total attacks generated");
    describe_counter!("redforge_tests_total", "Total attacks executed against a target");
    describe_histogram!(
        "redforge_round_duration_ms",
        "Round processing duration in milliseconds"
    );
    describe_histogram!(
        "redforge_target_call_duration_ms",
        "Target HTTP call duration in milliseconds"
    );
    describe_gauge!("redforge_current_phase", "Currently active planner phase (1 = active)");
    describe_gauge!("redforge_cost_usd", "Cumulative generator cost in USD");
    describe_counter!("redforge_errors_total", "Total number of errors by category");
    describe_gauge!("redforge_coverage_ratio", "Fraction of taxonomy techniques exercised");
}

pub fn record_round(scenario: &str) {
    let label = sanitize_scenario_label(scenario);
    counter!("redforge_rounds_total", "scenario" => label.to_owned()).increment(1);
}

pub fn record_test(scenario: &str, detected: bool) {
    let label = sanitize_scenario_label(scenario);
    counter!(
        "redforge_tests_total",
        "scenario" => label.to_owned(),
        "detected" => detected.to_string(),
    )
    .increment(1);
}

pub fn record_round_duration(duration: Duration) {
    histogram!("redforge_round_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

pub fn record_target_call_duration(duration: Duration) {
    histogram!("redforge_target_call_duration_ms").record(duration.as_secs_f64() * 1000.0);
}

pub fn set_current_phase(phase_name: &str, previous_phase: Option<&str>) {
    if let Some(prev) = previous_phase {
        gauge!("redforge_current_phase", "phase_name" => prev.to_owned()).set(0.0);
    }
    gauge!("redforge_current_phase", "phase_name" => phase_name.to_owned()).set(1.0);
}

pub fn set_cost(cost_usd: f64) {
    gauge!("redforge_cost_usd").set(cost_usd);
}

pub fn record_error(category: &str) {
    counter!("redforge_errors_total", "category" => category.to_owned()).increment(1);
}

pub fn set_coverage_ratio(ratio: f64) {
    gauge!("redforge_coverage_ratio").set(ratio);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_known_scenario_returns_original() {
        assert_eq!(sanitize_scenario_label("prompt_injection"), "prompt_injection");
    }

    #[test]
    fn sanitize_unknown_scenario_returns_unknown() {
        assert_eq!(sanitize_scenario_label("evil_scenario"), "__unknown__");
    }

    #[test]
    fn record_functions_do_not_panic_without_recorder() {
        record_round("prompt_injection");
        record_test("prompt_injection", true);
        record_round_duration(Duration::from_millis(250));
        record_target_call_duration(Duration::from_millis(30));
        set_current_phase("exploration", None);
        set_cost(0.05);
        record_error("transient");
        set_coverage_ratio(0.5);
    }
}
