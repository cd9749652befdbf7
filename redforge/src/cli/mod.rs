//! Command-line surface: argument parsing and command dispatch for hosting
//! the Evaluator Service Facade.

pub mod args;
pub mod commands;

pub use args::Cli;
