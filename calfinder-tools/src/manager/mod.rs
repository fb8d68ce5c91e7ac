//! Locating external programs

use crate::runner::query_version;
use crate::types::Tool;
use calfinder_core::config::ToolsConfig;
use calfinder_core::{CalfError, CalfResult};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Where a tool was found and what it reports about itself
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub tool: Tool,
    pub binary_path: Option<PathBuf>,
    pub version: Option<String>,
}

impl ToolInfo {
    pub fn is_available(&self) -> bool {
        self.binary_path.is_some()
    }
}

/// Resolves tool binaries from explicit paths, falling back to `$PATH`
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    overrides: HashMap<Tool, PathBuf>,
}

impl ToolManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Explicit binary paths from the `[tools]` configuration section
    pub fn from_config(config: &ToolsConfig) -> Self {
        let mut manager = Self::new();
        if let Some(path) = &config.hmmsearch {
            manager = manager.with_binary(Tool::Hmmsearch, path.clone());
        }
        if let Some(path) = &config.blastp {
            manager = manager.with_binary(Tool::Blastp, path.clone());
        }
        manager
    }

    pub fn with_binary(mut self, tool: Tool, path: PathBuf) -> Self {
        self.overrides.insert(tool, path);
        self
    }

    /// Path to the tool's binary.
    ///
    /// An explicitly configured path must exist; it is never silently
    /// replaced by whatever is on `$PATH`.
    pub fn locate(&self, tool: Tool) -> CalfResult<PathBuf> {
        if let Some(path) = self.overrides.get(&tool) {
            return if path.exists() {
                Ok(path.clone())
            } else {
                Err(CalfError::NotFound(format!(
                    "{} binary at {}",
                    tool.name(),
                    path.display()
                )))
            };
        }

        which::which(tool.binary_name()).map_err(|_| {
            CalfError::NotFound(format!(
                "{} not found on PATH; install {} or set tools.{} in the configuration",
                tool.binary_name(),
                tool.display_name(),
                tool.name()
            ))
        })
    }

    pub fn is_installed(&self, tool: Tool) -> bool {
        self.locate(tool).is_ok()
    }

    /// Availability and version of one tool
    pub fn inspect(&self, tool: Tool) -> ToolInfo {
        let binary_path = self.locate(tool).ok();
        let version = binary_path
            .as_ref()
            .and_then(|path| query_version(tool, path).ok());
        ToolInfo {
            tool,
            binary_path,
            version,
        }
    }

    pub fn list_all_tools(&self) -> Vec<ToolInfo> {
        Tool::ALL.iter().map(|&tool| self.inspect(tool)).collect()
    }
}
