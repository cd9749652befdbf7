//! TaxonomyProvider + TTPSelector: loads techniques and ranks them against
//! a target profile.

mod bundled;
mod selector;

pub use bundled::BundledTaxonomyProvider;
pub use selector::TtpSelector;

use redforge_core::model::Technique;

/// Produces an ordered, finite, restartable sequence of `Technique`
/// records. Implementations must preserve ATT&CK/ATLAS source tagging and
/// must not silently drop records.
pub trait TaxonomyProvider: Send + Sync {
    /// A name identifying this taxonomy, surfaced in coverage reports.
    fn name(&self) -> &str;

    /// All techniques this provider knows about, in a stable order.
    fn all_techniques(&self) -> Vec<Technique>;
}
