use calfinder_core::FeatureClass;
use serde::{Deserialize, Serialize};

/// One annotation on one sequence.
///
/// Coordinates are 1-based inclusive. `domid == None` marks a linker
/// interval; those only exist between deoverlap and filtering and never
/// reach a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    pub seqid: String,
    pub domid: Option<String>,
    pub start: usize,
    pub end: usize,
    pub evalue: Option<f64>,
    /// Fraction of the profile or subject spanned, not a percentage
    pub coverage: Option<f64>,
    pub desc: FeatureClass,
    pub src: String,
}

impl Hit {
    pub fn is_linker(&self) -> bool {
        self.domid.is_none()
    }

    /// Domain label, empty for linkers
    pub fn label(&self) -> &str {
        self.domid.as_deref().unwrap_or("")
    }

    pub fn span_len(&self) -> usize {
        self.end + 1 - self.start
    }
}
