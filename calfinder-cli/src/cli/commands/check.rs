use crate::cli::output::*;
use anyhow::{Context, Result};
use calfinder_core::system::describe_paths;
use calfinder_core::{load_config, Config};
use calfinder_tools::{ToolInfo, ToolManager};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file providing tool and data paths
    #[arg(short, long, value_name = "FILE", env = "CALFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize)]
struct DataFile {
    role: &'static str,
    path: PathBuf,
    found: bool,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    tools: Vec<ToolInfo>,
    data: Vec<DataFile>,
}

fn data_files(config: &Config) -> Vec<DataFile> {
    let mut entries = vec![("GlyX3 profile", config.triplication.profile_path())];
    for (role, path) in ["Gly1 profile", "Gly2 profile", "Gly3 profile"]
        .into_iter()
        .zip(config.glyzip.profile_paths())
    {
        entries.push((role, path));
    }
    entries.push(("N-ter database", config.nter.database_path()));
    entries.push(("N-ter mapping", config.nter.mapping_path()));

    entries
        .into_iter()
        .map(|(role, path)| DataFile {
            role,
            found: path.is_file(),
            path,
        })
        .collect()
}

pub fn run(args: CheckArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };

    let report = CheckReport {
        tools: ToolManager::from_config(&config.tools).list_all_tools(),
        data: data_files(&config),
    };

    match args.format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "text" => print_text(&report),
        other => anyhow::bail!("Unknown format '{}'. Use: text, json", other),
    }
    Ok(())
}

fn print_text(report: &CheckReport) {
    section_header("External Tools");
    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Tool"),
        header_cell("Status"),
        header_cell("Version"),
        header_cell("Path"),
    ]);
    for info in &report.tools {
        table.add_row(vec![
            comfy_table::Cell::new(info.tool.display_name()),
            status_cell(info.is_available()),
            comfy_table::Cell::new(info.version.as_deref().unwrap_or("-")),
            comfy_table::Cell::new(
                info.binary_path
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ]);
    }
    println!("{}", table);

    section_header("Reference Data");
    for line in describe_paths().lines() {
        println!("  {}", line);
    }
    let mut table = create_standard_table();
    table.set_header(vec![header_cell("File"), header_cell("Status"), header_cell("Path")]);
    for file in &report.data {
        table.add_row(vec![
            comfy_table::Cell::new(file.role),
            status_cell(file.found),
            comfy_table::Cell::new(file.path.display().to_string()),
        ]);
    }
    println!("{}", table);

    let missing_tools = report.tools.iter().filter(|t| !t.is_available()).count();
    let missing_data = report.data.iter().filter(|d| !d.found).count();
    if missing_tools + missing_data == 0 {
        success("Everything needed for `calfinder run` is in place");
    } else {
        warning(&format!(
            "{} tool(s) and {} data file(s) missing",
            missing_tools, missing_data
        ));
        info("Set CALFINDER_DATA_DIR or the [tools] config section to point at them");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_files_follow_config() {
        let dir = TempDir::new().unwrap();
        let profile = dir.path().join("GlyX3.hmm");
        std::fs::write(&profile, "HMMER3/f\n").unwrap();

        let mut config = Config::default();
        config.triplication.profile = Some(profile.clone());
        config.nter.mapping = Some(dir.path().join("absent.tsv"));

        let files = data_files(&config);
        assert_eq!(files.len(), 6);
        assert_eq!(files[0].path, profile);
        assert!(files[0].found);
        assert_eq!(files[5].role, "N-ter mapping");
        assert!(!files[5].found);
    }
}
