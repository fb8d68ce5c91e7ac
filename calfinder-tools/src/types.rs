//! External programs the pipeline drives

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    Hmmsearch,
    Blastp,
}

impl Tool {
    pub const ALL: [Tool; 2] = [Tool::Hmmsearch, Tool::Blastp];

    /// Get the name of the tool
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Hmmsearch => "hmmsearch",
            Tool::Blastp => "blastp",
        }
    }

    /// Get the display name of the tool
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Hmmsearch => "HMMER hmmsearch",
            Tool::Blastp => "BLAST+ blastp",
        }
    }

    /// Get the binary name for the tool
    pub fn binary_name(&self) -> &'static str {
        self.name()
    }

    /// Argument that makes the binary print its version
    pub fn version_arg(&self) -> &'static str {
        match self {
            Tool::Hmmsearch => "-h",
            Tool::Blastp => "-version",
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Tool {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "hmmsearch" | "hmmer" => Ok(Tool::Hmmsearch),
            "blastp" | "blast" => Ok(Tool::Blastp),
            _ => anyhow::bail!("Unknown tool: {}", s),
        }
    }
}
