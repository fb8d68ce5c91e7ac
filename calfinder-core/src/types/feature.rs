//! Semantic class carried by every annotation record

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which pipeline stage produced an annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureClass {
    /// C-terminal glycine triplication (GlyX3)
    Cter,
    /// Glycine zipper sub-domain
    Glyzip,
    /// N-terminal classification
    Nter,
}

impl FeatureClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cter => "cter",
            Self::Glyzip => "glyzip",
            Self::Nter => "nter",
        }
    }
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureClass {
    type Err = crate::CalfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cter" => Ok(Self::Cter),
            "glyzip" => Ok(Self::Glyzip),
            "nter" => Ok(Self::Nter),
            other => Err(crate::CalfError::Parse(format!(
                "Unknown feature class: {}",
                other
            ))),
        }
    }
}
