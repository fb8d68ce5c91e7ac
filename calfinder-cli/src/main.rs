use calfinder_cli::cli::{Cli, Commands};
use calfinder_core::CalfError;
use clap::Parser;
use colored::*;
use std::fs::File;
use std::process;
use std::sync::Mutex;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(exit_code(&e));
    }
}

/// Exit status for an error, from the first `CalfError` in its chain
fn exit_code(e: &anyhow::Error) -> i32 {
    e.chain()
        .find_map(|cause| cause.downcast_ref::<CalfError>())
        .map(CalfError::exit_code)
        .unwrap_or(1)
}

/// Log level from CALFINDER_LOG (default info); `-v` raises it to debug,
/// `-vv` to trace. `run --log` mirrors events to a file.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = match cli.verbose {
        0 => std::env::var("CALFINDER_LOG").unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = match cli.log_file() {
        Some(path) => {
            let file = File::create(path).map_err(CalfError::Io)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()?;
    Ok(())
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Configure thread pool
    let num_threads = if cli.threads == 0 {
        num_cpus::get()
    } else {
        cli.threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .map_err(|e| CalfError::Other(format!("Failed to initialize thread pool: {}", e)))?;
    tracing::debug!("Using {} threads", num_threads);

    match cli.command {
        Commands::Run(mut args) => {
            args.threads = cli.threads;
            calfinder_cli::cli::commands::run::run(args)
        }
        Commands::Summarize(args) => calfinder_cli::cli::commands::summarize::run(args),
        Commands::Check(args) => calfinder_cli::cli::commands::check::run(args),
        Commands::Config(args) => calfinder_cli::cli::commands::config::run(args),
    }
}
