//! Subprocess plumbing shared by the tool backends

use crate::types::Tool;
use anyhow::{Context, Result};
use calfinder_core::CalfError;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::{Command, Output};
use std::time::Duration;

/// stderr fragments that mean the run failed even on a zero exit status
pub const STDERR_DIAGNOSTICS: [&str; 4] = [
    "Error:",
    "BLAST query/options error",
    "BLAST engine error",
    "Segmentation fault",
];

/// Run a command to completion and reject failed runs
pub fn run_checked(tool: Tool, cmd: &mut Command) -> Result<Output, CalfError> {
    tracing::debug!("Running {:?}", cmd);
    let output = cmd
        .output()
        .map_err(|e| CalfError::tool(tool.name(), format!("could not start: {}", e)))?;
    check_output(tool, &output)?;
    Ok(output)
}

/// Non-zero exit or a known diagnostic on stderr is a tool failure
pub fn check_output(tool: Tool, output: &Output) -> Result<(), CalfError> {
    let stderr = String::from_utf8_lossy(&output.stderr);

    if !output.status.success() {
        let code = output
            .status
            .code()
            .map_or_else(|| "killed by signal".to_string(), |c| format!("exit code {}", c));
        return Err(CalfError::tool(
            tool.name(),
            format!("{}: {}", code, stderr.trim()),
        ));
    }

    if let Some(diagnostic) = STDERR_DIAGNOSTICS.iter().find(|d| stderr.contains(*d)) {
        return Err(CalfError::tool(
            tool.name(),
            format!("reported '{}': {}", diagnostic, stderr.trim()),
        ));
    }

    Ok(())
}

/// Ask a binary for its version string
pub fn query_version(tool: Tool, binary: &Path) -> Result<String> {
    let output = Command::new(binary)
        .arg(tool.version_arg())
        .output()
        .with_context(|| format!("Failed to run {} {}", binary.display(), tool.version_arg()))?;

    let text = String::from_utf8_lossy(&output.stdout);
    let line = match tool {
        // hmmsearch -h: "# HMMER 3.3.2 (Nov 2020); http://hmmer.org/"
        Tool::Hmmsearch => text
            .lines()
            .find(|l| l.contains("HMMER"))
            .map(|l| l.trim_start_matches('#').trim()),
        Tool::Blastp => text.lines().next().map(str::trim),
    };

    line.filter(|l| !l.is_empty())
        .map(str::to_string)
        .with_context(|| format!("No version reported by {}", binary.display()))
}

/// Spinner shown while an external program runs; hidden with CALFINDER_SILENT
pub fn spinner(message: String) -> ProgressBar {
    if std::env::var("CALFINDER_SILENT").is_ok() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}
