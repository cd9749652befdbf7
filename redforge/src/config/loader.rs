//! YAML config file loading, plus environment-variable layering for the
//! ambient concerns (`REPORT_DIR`, `SANDBOX_IMAGE`) that the facade's JSON
//! request body never carries.

use std::path::Path;

use redforge_core::config::EvaluatorRequest;

use crate::error::{Error, Result};

/// Ambient settings read from the process environment rather than the RPC
/// body. No credentials are logged when these are read or used.
#[derive(Debug, Clone)]
pub struct EnvOverrides {
    pub report_dir: String,
    pub sandbox_image: Option<String>,
}

impl EnvOverrides {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            report_dir: std::env::var("REPORT_DIR").unwrap_or_else(|_| "reports".to_string()),
            sandbox_image: std::env::var("SANDBOX_IMAGE").ok(),
        }
    }
}

/// Loads an `EvaluatorRequest` from a YAML file and validates it.
///
/// # Errors
/// Returns `Error::Io` if the file cannot be read, `Error::Yaml` if it does
/// not parse, or `Error::Eval(Validation)` if it fails `validate_request`.
pub fn load_request_file(path: &Path) -> Result<EvaluatorRequest> {
    let raw = std::fs::read_to_string(path)?;
    let request: EvaluatorRequest = serde_yaml::from_str(&raw)?;
    super::validate_request(&request).map_err(Error::Eval)?;
    Ok(request)
}
