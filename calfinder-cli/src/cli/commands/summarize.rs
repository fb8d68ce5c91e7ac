use crate::cli::output::*;
use crate::report::{read_features, write_summary, write_summary_to_writer};
use anyhow::{Context, Result};
use calfinder_bio::annotation::summarize;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Feature table written by `calfinder run` (features.tsv)
    #[arg(value_name = "FEATURES")]
    pub features: PathBuf,

    /// Write the summary here instead of standard output
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: SummarizeArgs) -> Result<()> {
    let hits = read_features(&args.features)?;
    tracing::debug!("{} features read from {}", hits.len(), args.features.display());
    let rows = summarize(&hits);

    match &args.output {
        Some(path) => {
            write_summary(path, &rows)?;
            let trusted = rows.iter().filter(|r| r.is_trusted()).count();
            success(&format!(
                "{} sequences summarized, {} reliable calcyanin, written to {}",
                rows.len(),
                trusted,
                path.display()
            ));
        }
        None => {
            let stdout = std::io::stdout();
            write_summary_to_writer(stdout.lock(), &rows).context("Failed to write summary")?;
        }
    }
    Ok(())
}
