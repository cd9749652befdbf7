//! Configuration loading and validation.
//!
//! Loads an [`redforge_core::config::EvaluatorRequest`] from a YAML file on
//! disk (for CLI-driven one-shot runs) and validates it before it reaches
//! the engine, matching the facade's own validation boundary.

mod loader;
mod validation;

pub use loader::{EnvOverrides, load_request_file};
pub use validation::validate_request;
