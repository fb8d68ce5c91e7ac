pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "calfinder",
    version,
    about = "Calcyanin detection and modular domain classification",
    long_about = "calfinder searches translated CDS sets for calcyanin proteins in three steps: \
                  the glycine triplication (GlyX3) is searched with a profile HMM, glycine zippers \
                  are annotated on triplication-positive sequences, and their N-terminal region \
                  is classified by blastp against known N-ter references."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Number of threads to use (0 = all available)
    #[arg(short = 'j', long, default_value = "0", global = true)]
    pub threads: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search and classify calcyanins in protein sequences
    Run(commands::run::RunArgs),

    /// Recompute the summary from an existing feature table
    Summarize(commands::summarize::SummarizeArgs),

    /// Report availability of hmmsearch, blastp and the reference data
    Check(commands::check::CheckArgs),

    /// Print or save the default configuration
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Log file requested by the subcommand, if any
    pub fn log_file(&self) -> Option<&std::path::Path> {
        match &self.command {
            Commands::Run(args) => args.log.as_deref(),
            _ => None,
        }
    }
}
