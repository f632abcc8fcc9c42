//! crimerisk - crime-risk lookups from the terminal
//!
//! Usage:
//!   crimerisk                                             # Interactive form
//!   crimerisk predict --location Kerala --district Kochi  # One-shot prediction
//!   crimerisk options                                     # List locations
//!   crimerisk options --location Kerala                   # List districts

use clap::{Parser, Subcommand};
use crimerisk::artifacts::{
    ArtifactPaths, ArtifactStore, DEFAULT_DATASET_PATH, DEFAULT_ENCODERS_PATH, DEFAULT_MODEL_PATH,
};
use crimerisk::form::DEFAULT_YEAR;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod output;

use commands::{form, options, predict};
use error::{CliError, Result};

/// crimerisk - predict crime risk for a state/UT, district and year
#[derive(Parser, Debug)]
#[command(name = "crimerisk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Serialized classifier
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_MODEL_PATH)]
    model: PathBuf,

    /// Label encoders (JSON)
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_ENCODERS_PATH)]
    encoders: PathBuf,

    /// Reference dataset (CSV with STATE/UT and DISTRICT columns)
    #[arg(long, global = true, value_name = "FILE", default_value = DEFAULT_DATASET_PATH)]
    dataset: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive terminal form (default)
    Form,

    /// Predict once and print the notice
    Predict {
        /// State/UT name as listed in the dataset
        #[arg(long)]
        location: String,

        /// District name within the location
        #[arg(long)]
        district: String,

        /// Year (2000-2025)
        #[arg(long, default_value_t = DEFAULT_YEAR, allow_negative_numbers = true)]
        year: i32,
    },

    /// List locations, or the districts of one location
    Options {
        /// Show districts of this location
        #[arg(long)]
        location: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Form);

    // The form owns the terminal, so it only logs when given a file.
    let interactive = matches!(command, Commands::Form);
    if let Err(e) = init_logging(cli.verbose, cli.log_file.as_deref(), interactive) {
        eprintln!("error: {e}");
        return e.exit_code();
    }

    let store = ArtifactStore::new(ArtifactPaths {
        model: cli.model,
        encoders: cli.encoders,
        dataset: cli.dataset,
    });

    let result = match command {
        Commands::Form => store.context().map_err(CliError::from).and_then(form::run),
        Commands::Predict {
            location,
            district,
            year,
        } => predict::run(&store, &location, &district, year),
        Commands::Options { location } => options::run(&store, location.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command.failed");
            eprintln!("error: {e}");
            e.exit_code()
        }
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>, interactive: bool) -> Result<()> {
    let filter = match verbose {
        0 => EnvFilter::new("crimerisk=info"),
        1 => EnvFilter::new("crimerisk=debug"),
        _ => EnvFilter::new("crimerisk=trace"),
    };
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE);

    match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None if interactive => {}
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
