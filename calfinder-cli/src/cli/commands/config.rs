use crate::cli::output::*;
use anyhow::{Context, Result};
use calfinder_core::config::default_config;
use calfinder_core::save_config;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Save the default configuration to this file instead of printing it
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ConfigArgs) -> Result<()> {
    let config = default_config();
    match &args.output {
        Some(path) => {
            save_config(path, &config)?;
            success(&format!("Default configuration written to {}", path.display()));
        }
        None => {
            let text = toml::to_string_pretty(&config).context("Failed to render configuration")?;
            print!("{}", text);
        }
    }
    Ok(())
}
