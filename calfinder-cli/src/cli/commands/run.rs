use crate::cli::output::*;
use crate::pipeline::{Pipeline, RunSummary};
use crate::report::OutputLayout;
use anyhow::{Context, Result};
use calfinder_bio::formats::read_fasta_input;
use calfinder_core::{load_config, Config};
use calfinder_tools::{BlastpAligner, HmmsearchRunner, Tool, ToolManager};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// FASTA file or directory of FASTA files (translated CDS)
    #[arg(short, long, value_name = "PATH")]
    pub input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Extension of input files when the input is a directory [default: faa.gz]
    #[arg(short = 'e', long)]
    pub extension: Option<String>,

    /// Configuration file (TOML); flags below override its values
    #[arg(short, long, value_name = "FILE", env = "CALFINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror log output to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// GlyX3 profile HMM
    #[arg(long, value_name = "FILE")]
    pub glyx3_hmm: Option<PathBuf>,

    /// Gly1 glycine zipper profile HMM
    #[arg(long, value_name = "FILE")]
    pub gly1_hmm: Option<PathBuf>,

    /// Gly2 glycine zipper profile HMM
    #[arg(long, value_name = "FILE")]
    pub gly2_hmm: Option<PathBuf>,

    /// Gly3 glycine zipper profile HMM
    #[arg(long, value_name = "FILE")]
    pub gly3_hmm: Option<PathBuf>,

    /// N-ter reference database (FASTA)
    #[arg(long, value_name = "FILE")]
    pub nterdb: Option<PathBuf>,

    /// N-ter reference mapping table
    #[arg(long, value_name = "FILE")]
    pub nter_mapping: Option<PathBuf>,

    /// Full-sequence E-value gate for the triplication [default: 1e-30]
    #[arg(long)]
    pub glyx3_evalue: Option<f64>,

    /// Domain i-Evalue threshold for the triplication [default: 1]
    #[arg(long)]
    pub glyx3_i_evalue: Option<f64>,

    /// Minimal GlyX3 profile coverage, as a fraction [default: 0.62]
    #[arg(long)]
    pub glyx3_coverage: Option<f64>,

    /// Domain i-Evalue threshold for glycine zippers [default: 3.6e-4]
    #[arg(long)]
    pub glyzip_i_evalue: Option<f64>,

    /// Full-sequence E-value threshold for glycine zippers [default: 1]
    #[arg(long)]
    pub glyzip_evalue: Option<f64>,

    /// Minimal glycine zipper profile coverage, as a fraction [default: 0.65]
    #[arg(long)]
    pub glyzip_coverage: Option<f64>,

    /// N-ter E-value threshold [default: 1e-7]
    #[arg(long)]
    pub nter_evalue: Option<f64>,

    /// Minimal N-ter subject coverage, as a fraction [default: 0.8]
    #[arg(long)]
    pub nter_coverage: Option<f64>,

    /// Search space size for domain E-values [default: 10000]
    #[arg(long)]
    pub domz: Option<f64>,

    /// Skip the per-stage tables under intermediates/
    #[arg(long)]
    pub no_intermediates: bool,

    /// Number of threads (passed from global)
    #[arg(skip)]
    pub threads: usize,
}

impl RunArgs {
    /// Layer command line values over a loaded or default configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(ext) = &self.extension {
            config.output.input_extension = ext.clone();
        }
        if self.no_intermediates {
            config.output.write_intermediates = false;
        }
        if self.threads > 0 {
            config.search.threads = self.threads;
        }
        if let Some(z) = self.domz {
            config.search.dom_z = z;
        }

        if let Some(path) = &self.glyx3_hmm {
            config.triplication.profile = Some(path.clone());
        }
        if let Some(v) = self.glyx3_evalue {
            config.triplication.evalue = v;
        }
        if let Some(v) = self.glyx3_i_evalue {
            config.triplication.i_evalue = v;
        }
        if let Some(v) = self.glyx3_coverage {
            config.triplication.coverage = v;
        }

        let zips = [&self.gly1_hmm, &self.gly2_hmm, &self.gly3_hmm];
        if zips.iter().any(|p| p.is_some()) {
            let mut profiles = config.glyzip.profile_paths();
            // Short lists take the bundled profiles for the missing slots
            if profiles.len() < zips.len() {
                let bundled = Config::default().glyzip.profile_paths();
                profiles.extend(bundled.into_iter().skip(profiles.len()));
            }
            for (slot, given) in profiles.iter_mut().zip(zips) {
                if let Some(path) = given {
                    *slot = path.clone();
                }
            }
            config.glyzip.profiles = profiles;
        }
        if let Some(v) = self.glyzip_i_evalue {
            config.glyzip.i_evalue = v;
        }
        if let Some(v) = self.glyzip_evalue {
            config.glyzip.evalue = v;
        }
        if let Some(v) = self.glyzip_coverage {
            config.glyzip.min_coverage = v;
        }

        if let Some(path) = &self.nterdb {
            config.nter.database = Some(path.clone());
        }
        if let Some(path) = &self.nter_mapping {
            config.nter.mapping = Some(path.clone());
        }
        if let Some(v) = self.nter_evalue {
            config.nter.evalue = v;
        }
        if let Some(v) = self.nter_coverage {
            config.nter.coverage = v;
        }
    }

    /// Configuration file (if any) plus command line overrides, validated
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => Config::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = args.resolve_config()?;

    section_header("calfinder run");
    tracing::info!("Loading input sequences from {}", args.input.display());
    let sequences = read_fasta_input(&args.input, &config.output.input_extension)?;
    info(&format!("{} input sequences", sequences.len()));

    let manager = ToolManager::from_config(&config.tools);
    let searcher = HmmsearchRunner::new(manager.locate(Tool::Hmmsearch)?)?;
    let aligner = BlastpAligner::new(manager.locate(Tool::Blastp)?)?;

    let layout = OutputLayout::new(&args.output);
    let mut pipeline = Pipeline::new(config, searcher, aligner);
    let summary = pipeline.run(&sequences, &layout)?;

    print_summary(&summary, &layout);
    Ok(())
}

fn print_summary(summary: &RunSummary, layout: &OutputLayout) {
    section_header("Results");
    tree_item(false, "Sequences", Some(&summary.sequences.to_string()));
    tree_item(
        false,
        "Glycine triplication",
        Some(&format!(
            "{} hits, {} positive",
            summary.triplication_hits, summary.triplication_positive
        )),
    );
    tree_item(false, "Glycine zipper domains", Some(&summary.glyzip_domains.to_string()));
    tree_item(true, "N-ter assignments", Some(&summary.nter_hits.to_string()));

    if summary.summarized == 0 {
        warning("No calcyanin found");
    } else {
        for (flag, count) in &summary.flags {
            info(&format!("{}: {}", flag, count));
        }
        success(&format!("{} reliable calcyanin found", summary.trusted));
    }
    info(&format!("Reports written to {}", layout.root().display()));
}
