use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which taxonomy a `Technique` was sourced from. Preserved end to end so
/// provenance is never lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechniqueSource {
    /// MITRE ATT&CK.
    Attack,
    /// MITRE ATLAS (AI/ML-specific).
    Atlas,
}

/// One taxonomy entry (a TTP) describing an adversary behavior, scored
/// against a `TargetProfile` by the `TTPSelector`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Technique {
    pub technique_id: String,
    pub name: String,
    pub source: TechniqueSource,
    #[serde(default)]
    pub tactics: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

impl Technique {
    #[must_use]
    pub fn new(
        technique_id: impl Into<String>,
        name: impl Into<String>,
        source: TechniqueSource,
        tactics: Vec<String>,
        platforms: Vec<String>,
    ) -> Self {
        Self {
            technique_id: technique_id.into(),
            name: name.into(),
            source,
            tactics,
            platforms,
            score: 0.0,
            metadata: HashMap::new(),
        }
    }
}
