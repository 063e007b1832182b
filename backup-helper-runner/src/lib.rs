//! # backup-helper-runner
//!
//! Runs external tools and records their output twice: live, line by line,
//! into the shared [`LiveLog`], and in memory for the final report.
//!
//! Leaves first:
//! - [`reassembler`]: bytes in, complete lines out
//! - [`live_log`]: the locked stderr + log file sink
//! - [`recorder`]: fans each line to the live sink and the capture buffer
//! - [`command`]: spawns a program and wires both pipes through a recorder

pub mod command;
pub mod error;
pub mod live_log;
pub mod reassembler;
pub mod recorder;

pub use command::{run_command, CommandSpec};
pub use error::{CommandFailure, FailureReason, RecordError};
pub use live_log::LiveLog;
pub use reassembler::LineReassembler;
pub use recorder::{Recorder, RecorderStream};
