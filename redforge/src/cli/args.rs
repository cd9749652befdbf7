//! CLI argument definitions.
//!
//! All clap derive structs for the `redforge` command line.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

/// Adversarial security-evaluation engine.
#[derive(Parser, Debug)]
#[command(name = "redforge", author, version, about)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-error output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log output format.
    #[arg(long, default_value = "human", global = true, env = "REDFORGE_LOG_FORMAT")]
    pub log_format: LogFormatArg,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Host the Evaluator Service Facade.
    Serve(ServeArgs),

    /// Display version and build information.
    Version(VersionArgs),
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Bind address for the facade's HTTP listener.
    #[arg(long, default_value = "0.0.0.0", env = "REDFORGE_HOST")]
    pub host: String,

    /// Bind port for the facade's HTTP listener.
    #[arg(long, default_value_t = 8080, env = "REDFORGE_PORT")]
    pub port: u16,

    /// Public URL this service advertises at its own
    /// `/.well-known/agent-card.json`, for evaluators chained behind a
    /// proxy or load balancer. Defaults to the bind address.
    #[arg(long, env = "REDFORGE_CARD_URL")]
    pub card_url: Option<String>,

    /// Prefix prepended to generated evaluation ids, to disambiguate
    /// evaluations from multiple co-located instances.
    #[arg(long, env = "REDFORGE_NAME_PREFIX")]
    pub name_prefix: Option<String>,

    /// Wire an LLM `Generator` into the Mutator and Judge agents for
    /// paraphrase refinement and ambiguous-case adjudication. Without this
    /// flag both agents run in their rule-based, zero-cost mode.
    #[arg(long, env = "REDFORGE_ENABLE_GENERATORS")]
    pub enable_generators: bool,

    /// Start a Prometheus metrics endpoint on this port.
    #[arg(long, env = "REDFORGE_METRICS_PORT")]
    pub metrics_port: Option<u16>,
}

/// Arguments for `version`.
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output format.
    #[arg(short, long, default_value = "human")]
    pub format: OutputFormat,
}

/// Log output format, as a CLI-parseable mirror of
/// [`crate::observability::LogFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormatArg {
    #[default]
    Human,
    Json,
}

impl From<LogFormatArg> for crate::observability::LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Human => crate::observability::LogFormat::Human,
            LogFormatArg::Json => crate::observability::LogFormat::Json,
        }
    }
}

/// Output format for structured CLI output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_parses_with_defaults() {
        let cli = Cli::try_parse_from(["redforge", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected Serve");
        };
        assert_eq!(args.host, "0.0.0.0");
        assert_eq!(args.port, 8080);
        assert!(!args.enable_generators);
    }

    #[test]
    fn serve_parses_overrides() {
        let cli = Cli::try_parse_from([
            "redforge",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
            "--card-url",
            "https://evaluator.example/card.json",
            "--name-prefix",
            "ci",
            "--enable-generators",
        ])
        .unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected Serve");
        };
        assert_eq!(args.host, "127.0.0.1");
        assert_eq!(args.port, 9090);
        assert_eq!(args.card_url.as_deref(), Some("https://evaluator.example/card.json"));
        assert_eq!(args.name_prefix.as_deref(), Some("ci"));
        assert!(args.enable_generators);
    }

    #[test]
    fn verbose_count() {
        let cli = Cli::try_parse_from(["redforge", "-vvv", "serve"]).unwrap();
        assert_eq!(cli.verbose, 3);
    }

    #[test]
    fn version_defaults_to_human() {
        let cli = Cli::try_parse_from(["redforge", "version"]).unwrap();
        let Commands::Version(args) = cli.command else {
            panic!("expected Version");
        };
        assert_eq!(args.format, OutputFormat::Human);
    }

    #[test]
    fn help_output() {
        let result = Cli::try_parse_from(["redforge", "--help"]);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
