//! The live, append-only log sink shared by every producer in a run.
//!
//! In production this is standard error plus the per-run log file. Every
//! write goes through one mutex, so a line is written to all sinks before any
//! other producer gets a turn. Structured `tracing` records share the same
//! path through the [`MakeWriter`] impl.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing_subscriber::fmt::MakeWriter;

type Sink = Box<dyn Write + Send>;

/// Cloneable handle to the shared sinks.
#[derive(Clone)]
pub struct LiveLog {
    sinks: Arc<Mutex<Vec<Sink>>>,
}

impl LiveLog {
    pub fn new(sinks: Vec<Sink>) -> Self {
        LiveLog {
            sinks: Arc::new(Mutex::new(sinks)),
        }
    }

    /// Standard error plus `file`.
    pub fn stderr_and(file: std::fs::File) -> Self {
        Self::new(vec![Box::new(io::stderr()), Box::new(file)])
    }

    /// Write `prefix`, `line` and a newline as one unit.
    pub fn write_line(&self, prefix: &str, line: &[u8]) -> io::Result<()> {
        let mut buf = Vec::with_capacity(prefix.len() + line.len() + 1);
        buf.extend_from_slice(prefix.as_bytes());
        buf.extend_from_slice(line);
        buf.push(b'\n');
        self.write_all(&buf)
    }

    /// Write `buf` to every sink under the lock.
    ///
    /// All sinks are attempted; the first error is returned.
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        let mut sinks = self.lock();
        let mut first_err = None;
        for sink in sinks.iter_mut() {
            if let Err(err) = sink.write_all(buf).and_then(|()| sink.flush()) {
                first_err.get_or_insert(err);
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Sink>> {
        // A panic mid-write leaves at worst a torn line; keep logging.
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LiveLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveLog").finish_non_exhaustive()
    }
}

/// Per-event writer handed to `tracing_subscriber::fmt`.
pub struct LiveLogWriter {
    log: LiveLog,
}

impl Write for LiveLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.log.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LiveLog {
    type Writer = LiveLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LiveLogWriter { log: self.clone() }
    }
}
