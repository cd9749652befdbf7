//! `redforge` binary entry point: parses CLI arguments, initializes
//! logging, and dispatches to the selected command.

use clap::Parser;
use tokio_util::sync::CancellationToken;

use redforge::cli::Cli;
use redforge::cli::commands::dispatch;
use redforge::observability::init_logging;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let verbosity = if cli.quiet { 0 } else { cli.verbose };
    init_logging(cli.log_format.into(), verbosity);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("shutdown signal received");
        shutdown.cancel();
    });

    match dispatch(cli, cancel).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "startup failed");
            eprintln!("redforge: {err}");
            std::process::ExitCode::FAILURE
        }
    }
}
