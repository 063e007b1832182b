//! Error types for backup-helper-runner.

use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Failure while recording output.
#[derive(Debug, Error)]
pub enum RecordError {
    /// Writing to the live sink failed. Capture continued regardless.
    #[error("live log write failed: {0}")]
    LiveSink(#[source] std::io::Error),
}

/// Why a command did not succeed.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("could not launch: {0}")]
    Launch(#[source] std::io::Error),

    #[error("exited with {0}")]
    Exit(ExitStatus),

    /// Reading the child's pipes or waiting for it failed.
    #[error("output capture failed: {0}")]
    Capture(#[source] std::io::Error),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),
}

/// A failed command together with whatever it printed before failing.
///
/// `lines` always ends with a synthetic end-of-output marker naming the reason.
#[derive(Debug, Error)]
#[error("command {program} failed: {reason}")]
pub struct CommandFailure {
    pub program: String,
    #[source]
    pub reason: FailureReason,
    pub lines: Vec<String>,
}
