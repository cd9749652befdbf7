//! `serve` command: hosts the Evaluator Service Facade.

use tokio_util::sync::CancellationToken;

use crate::cli::args::ServeArgs;
use crate::config::EnvOverrides;
use crate::error::Result;
use crate::facade::{Facade, FacadeOptions};

/// Starts the facade's HTTP listener and runs until `cancel` fires.
///
/// # Errors
///
/// Returns an error if the listener fails to bind, or a request crashes the
/// server rather than being handled as a structured failure response.
pub async fn run(args: &ServeArgs, cancel: CancellationToken) -> Result<()> {
    if let Some(port) = args.metrics_port {
        crate::observability::init_metrics(Some(port))?;
        tracing::info!(port, "Prometheus metrics endpoint started");
    }

    let env = EnvOverrides::from_env();
    tracing::info!(report_dir = %env.report_dir, "report directory configured");

    let options = FacadeOptions {
        host: args.host.clone(),
        port: args.port,
        card_url: args.card_url.clone(),
        name_prefix: args.name_prefix.clone(),
        enable_generators: args.enable_generators,
        report_dir: env.report_dir.clone(),
    };

    let facade = Facade::new(options);
    facade.serve(cancel).await
}
