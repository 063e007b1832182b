//! Per-run log file and `tracing` setup.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, SecondsFormat};
use tracing_subscriber::{fmt, EnvFilter};

use backup_helper_runner::LiveLog;

/// `backup-helper-<RFC3339>.log`.
pub fn log_file_name(now: DateTime<Local>) -> String {
    format!(
        "backup-helper-{}.log",
        now.to_rfc3339_opts(SecondsFormat::Secs, false)
    )
}

/// Create the log file and the live sink (stderr + file) around it.
pub fn open(path: impl AsRef<Path>) -> Result<LiveLog> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("could not create log file {}", path.display()))?;
    Ok(LiveLog::stderr_and(file))
}

/// Route `tracing` records through `live`. `RUST_LOG` overrides the `info`
/// default.
pub fn init_tracing(live: &LiveLog) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(live.clone())
        .try_init();
}
