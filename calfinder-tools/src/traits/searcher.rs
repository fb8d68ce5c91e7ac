/// Traits for profile HMM search tools
use anyhow::Result;
use calfinder_bio::sequence::Sequence;
use std::path::PathBuf;

pub use calfinder_bio::annotation::records::{
    group_by_target, DomainAlignment, ProfileHits, TargetHit, TargetView,
};

/// Options shared by every profile search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Worker threads for the search engine; 0 lets the backend pick
    pub threads: usize,
    /// Effective number of sequences for domain E-values (`--domZ`)
    pub dom_z: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            threads: 0,
            dom_z: 10_000.0,
        }
    }
}

/// Trait for profile HMM search engines
pub trait ProfileSearcher: Send + Sync {
    /// Search every profile against the sequences, one result set per profile
    fn search(
        &mut self,
        sequences: &[Sequence],
        profiles: &[PathBuf],
        options: &SearchOptions,
    ) -> Result<Vec<ProfileHits>>;

    /// Get tool version
    fn version(&self) -> Result<String>;

    /// Check if tool is available
    fn is_available(&self) -> bool;
}
