/// Traits for local alignment tools
use anyhow::Result;
use std::path::Path;

pub use calfinder_bio::annotation::records::TabularHit;

/// Trait for alignment tools
pub trait Aligner: Send + Sync {
    /// Align every query record against every subject record.
    ///
    /// Malformed tool output is reported as a parse error so callers can
    /// tell it apart from a failed run.
    fn align(&mut self, query: &Path, subject: &Path, evalue: f64) -> Result<Vec<TabularHit>>;

    /// Get tool version
    fn version(&self) -> Result<String>;

    /// Check if tool is available
    fn is_available(&self) -> bool;
}
