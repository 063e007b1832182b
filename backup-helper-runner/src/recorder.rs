//! Dual-sink recording of one command's output.
//!
//! A [`Recorder`] belongs to a single command run. It hands out one
//! [`RecorderStream`] per pipe; each stream reassembles its own bytes into
//! lines behind its own mutex. Every completed line is then
//!
//! 1. appended to the in-memory capture (zero-length lines are skipped), and
//! 2. written to the shared [`LiveLog`] as `"[label] line"`.
//!
//! Both happen while the capture lock is held, so the capture lists lines in
//! the same order the live log received them.

use std::io;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::RecordError;
use crate::live_log::LiveLog;
use crate::reassembler::LineReassembler;

/// Output recorder for one command.
#[derive(Debug)]
pub struct Recorder {
    live: LiveLog,
    prefix: String,
    captured: Mutex<Vec<String>>,
}

impl Recorder {
    /// `label` becomes the `[label] ` prefix of every live line.
    pub fn new(live: LiveLog, label: &str) -> Self {
        let prefix = if label.is_empty() {
            String::new()
        } else {
            format!("[{label}] ")
        };
        Recorder {
            live,
            prefix,
            captured: Mutex::new(Vec::new()),
        }
    }

    /// A new input stream with its own line buffer.
    pub fn stream(&self) -> RecorderStream<'_> {
        RecorderStream {
            recorder: self,
            reassembler: Mutex::new(LineReassembler::new()),
        }
    }

    /// Record a synthetic line that did not come from the process.
    pub fn mark(&self, text: &str) -> Result<(), RecordError> {
        self.record(text.as_bytes()).map_err(RecordError::LiveSink)
    }

    #[cfg(test)]
    fn lines(&self) -> Vec<String> {
        self.captured().clone()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.captured
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, line: &[u8]) -> io::Result<()> {
        let mut captured = self.captured();
        if !line.is_empty() {
            captured.push(String::from_utf8_lossy(line).into_owned());
        }
        self.live.write_line(&self.prefix, line)
    }

    fn captured(&self) -> MutexGuard<'_, Vec<String>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One pipe's view of a [`Recorder`].
#[derive(Debug)]
pub struct RecorderStream<'a> {
    recorder: &'a Recorder,
    reassembler: Mutex<LineReassembler>,
}

impl RecorderStream<'_> {
    /// Record a chunk of raw output.
    ///
    /// Every completed line is captured even if the live sink fails; the
    /// first live failure is returned once the chunk is consumed.
    pub fn write(&self, chunk: &[u8]) -> Result<(), RecordError> {
        let mut reassembler = self.reassembler();
        let mut first_err = None;
        reassembler.feed(chunk, |line| {
            if let Err(err) = self.recorder.record(line) {
                first_err.get_or_insert(err);
            }
        });
        first_err.map_or(Ok(()), |err| Err(RecordError::LiveSink(err)))
    }

    /// Push a trailing unterminated line into both sinks.
    ///
    /// Call once, after the producer is done writing.
    pub fn flush(&self) -> Result<(), RecordError> {
        let mut reassembler = self.reassembler();
        let mut result = Ok(());
        reassembler.finish(|line| result = self.recorder.record(line));
        result.map_err(RecordError::LiveSink)
    }

    fn reassembler(&self) -> MutexGuard<'_, LineReassembler> {
        self.reassembler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
