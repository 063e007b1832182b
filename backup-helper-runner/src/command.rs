//! External command execution with dual-sink output capture.
//!
//! stdout and stderr are pumped concurrently, each through its own
//! [`RecorderStream`], while the exit is awaited. Lines from the two pipes may
//! interleave in any order, but never within a line. Once the process has
//! exited (or been killed on timeout) both streams are flushed.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;

use crate::error::{CommandFailure, FailureReason};
use crate::live_log::LiveLog;
use crate::recorder::{Recorder, RecorderStream};

const READ_CHUNK: usize = 8 * 1024;

/// What to run and how to tag its output.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Short tag prefixed to every live line, e.g. `verify:source`.
    pub label: String,
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Kill the process if it runs longer than this.
    pub timeout: Option<Duration>,
}

impl CommandSpec {
    pub fn new(label: impl Into<String>, program: impl Into<OsString>) -> Self {
        CommandSpec {
            label: label.into(),
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Run `spec` to completion and return its captured output lines.
///
/// Every line is also written to `live` as it arrives. On failure the lines
/// gathered so far, plus an end-of-output marker, travel in the error.
pub async fn run_command(live: &LiveLog, spec: &CommandSpec) -> Result<Vec<String>, CommandFailure> {
    let recorder = Recorder::new(live.clone(), &spec.label);
    tracing::debug!(label = %spec.label, program = %spec.program_name(), args = ?spec.args, "starting command");

    let spawned = Command::new(&spec.program)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => return Err(fail(spec, recorder, FailureReason::Launch(err))),
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let out_stream = recorder.stream();
    let err_stream = recorder.stream();

    let outcome = {
        let run = async {
            tokio::join!(
                pump(stdout, &out_stream, &spec.label),
                pump(stderr, &err_stream, &spec.label),
                child.wait(),
            )
        };
        match spec.timeout {
            None => Some(run.await),
            Some(limit) => tokio::time::timeout(limit, run).await.ok(),
        }
    };

    let reason = match outcome {
        Some((Ok(()), Ok(()), Ok(status))) if status.success() => None,
        Some((Ok(()), Ok(()), Ok(status))) => Some(FailureReason::Exit(status)),
        Some((Err(err), _, _)) | Some((_, Err(err), _)) | Some((_, _, Err(err))) => {
            Some(FailureReason::Capture(err))
        }
        None => {
            if let Err(err) = child.kill().await {
                tracing::warn!(label = %spec.label, error = %err, "could not kill timed out command");
            }
            spec.timeout.map(FailureReason::TimedOut)
        }
    };

    for stream in [&out_stream, &err_stream] {
        if let Err(err) = stream.flush() {
            tracing::warn!(label = %spec.label, error = %err, "live log flush failed");
        }
    }
    drop((out_stream, err_stream));

    match reason {
        None => {
            let lines = recorder.into_lines();
            tracing::debug!(label = %spec.label, lines = lines.len(), "command finished");
            Ok(lines)
        }
        Some(reason) => Err(fail(spec, recorder, reason)),
    }
}

/// Copy `pipe` into `stream` until EOF.
///
/// Live sink failures are logged and skipped; only read errors abort.
async fn pump<R>(pipe: Option<R>, stream: &RecorderStream<'_>, label: &str) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut pipe) = pipe else {
        return Ok(());
    };
    let mut buf = vec![0u8; READ_CHUNK];
    loop {
        let n = pipe.read(&mut buf).await?;
        if n == 0 {
            return Ok(());
        }
        if let Err(err) = stream.write(&buf[..n]) {
            tracing::warn!(label = %label, error = %err, "live log write failed; output still captured");
        }
    }
}

fn fail(spec: &CommandSpec, recorder: Recorder, reason: FailureReason) -> CommandFailure {
    let marker = format!("--- end of output ({reason}) ---");
    if let Err(err) = recorder.mark(&marker) {
        tracing::warn!(label = %spec.label, error = %err, "live log write failed");
    }
    CommandFailure {
        program: spec.program_name(),
        reason,
        lines: recorder.into_lines(),
    }
}
