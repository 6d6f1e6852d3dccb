//! `kindred`: a command-line family-tree manager.
//!
//! Each invocation loads the tree from the data file, runs one command, and
//! saves the tree again if the command changed it.
//!
//! # Startup Sequence
//!
//! 1. Parse arguments
//! 2. Load configuration from `kindred.yaml` (or `--config`) and `KINDRED_*`
//! 3. Initialize structured logging (tracing) to stderr
//! 4. Open the data file and synchronize partner marriage dates
//! 5. Run the command and print the result to stdout

mod cli;
mod commands;
mod config;
mod error;
mod output;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kindred_persist::FileBlobStore;

use crate::cli::Cli;
use crate::commands::Session;
use crate::config::{KindredConfig, LoggingConfig};

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded, the data file cannot
/// be read or written, or the command is rejected.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        KindredConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(data_file) = cli.data_file {
        config.storage.data_file = data_file;
    }

    init_tracing(&config.logging);
    tracing::debug!(data_file = %config.storage.data_file.display(), "configuration loaded");

    let blob = FileBlobStore::new(&config.storage.data_file);
    let mut session = Session::open(blob, config.date_policy(), config.storage.export_dir)
        .with_context(|| {
            format!(
                "failed to open family tree at {}",
                config.storage.data_file.display()
            )
        })?;

    let outcome = session.run(cli.command)?;
    println!("{}", output::render(&outcome));

    tracing::debug!(
        persons = session.tree().store().len(),
        data_file = %session.gateway().blob().path().display(),
        "done"
    );
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}
