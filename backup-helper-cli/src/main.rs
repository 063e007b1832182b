//! backup-helper: verified one-way mirror with an emailed report.
//!
//! # Usage
//!
//! ```text
//! backup-helper <source-dir> <backup-dir>
//! ```
//!
//! Reads `config.json` from the working directory and writes
//! `backup-helper-<timestamp>.log` next to it. Exits 0 only when the
//! backup succeeded and its report was sent.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::error::ErrorKind;
use clap::Parser;

use backup_helper_core::Config;
use backup_helper_mailer::{MailSettings, SmtpNotifier};
use backup_helper_runner::LiveLog;
use backup_helper_workflow::{BackupJob, Orchestrator};

/// Concurrent verification tasks at the fan-out point.
const WORKER_THREADS: usize = 2;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "backup-helper",
    version,
    about = "Verify two folders for bit rot, mirror the first into the second, and email a report",
    long_about = None,
)]
struct Cli {
    /// Folder to back up. Never modified.
    source: PathBuf,

    /// Backup folder. Made an exact mirror of the source.
    destination: PathBuf,
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> ExitCode {
    let log_path = logging::log_file_name(Local::now());
    let live = match logging::open(&log_path) {
        Ok(live) => live,
        Err(err) => {
            eprintln!("backup-helper: {err:#}");
            return ExitCode::FAILURE;
        }
    };
    logging::init_tracing(&live);
    tracing::debug!(log = %log_path, "logging started");

    match run(live) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "program failed");
            ExitCode::FAILURE
        }
    }
}

fn run(live: LiveLog) -> Result<()> {
    let cli = parse_args()?;
    tracing::debug!(source = %cli.source.display(), destination = %cli.destination.display(), "args parsed");

    let config = Config::load().context("could not load configuration")?;
    let notifier = SmtpNotifier::new(MailSettings::from_config(&config))?;
    let orchestrator = Orchestrator::new(live, config.tools.clone(), notifier)
        .with_command_timeout(config.command_timeout());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(WORKER_THREADS)
        .enable_all()
        .build()
        .context("could not start async runtime")?;
    let job = BackupJob::new(cli.source, cli.destination);
    runtime.block_on(orchestrator.run(&job))?;

    tracing::info!("backup finished and report sent");
    Ok(())
}

/// Parse the two positional folders. `--help` and `--version` exit 0 here;
/// any other parse failure becomes an error so the process exits 1.
fn parse_args() -> Result<Cli> {
    match Cli::try_parse() {
        Ok(cli) => Ok(cli),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => err.exit(),
        Err(err) => {
            let _ = err.print();
            Err(anyhow!("expected exactly two arguments: <source-dir> <backup-dir>"))
        }
    }
}
