use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

/// A writable destination for script output.
///
/// The engine never talks to stdout/stderr directly; everything it prints
/// goes through one of these, so a run can swap in a capture buffer and swap
/// the original back out afterwards.
pub trait OutputSink: Send + Sync {
    fn write(&self, text: &str);

    fn flush(&self) {}
}

/// Append-only text accumulator used as the capture shim during a run.
///
/// Cleared before each execution and read exactly once after it, via
/// [`CaptureBuffer::take`]. Both stream slots point at the same buffer while
/// redirected, so stdout and stderr text interleaves in write order.
#[derive(Default)]
pub struct CaptureBuffer {
    text: Mutex<String>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic inside an engine callback can poison the lock; the String
    // underneath is still valid, so recover it rather than propagate.
    fn lock(&self) -> MutexGuard<'_, String> {
        self.text.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Takes the accumulated text, leaving the buffer empty.
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.lock())
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl OutputSink for CaptureBuffer {
    fn write(&self, text: &str) {
        self.lock().push_str(text);
    }
}

/// Default sink for the stdout slot: the process's real standard output.
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write(&self, text: &str) {
        let _ = io::stdout().write_all(text.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

/// Default sink for the stderr slot.
pub struct StderrSink;

impl OutputSink for StderrSink {
    fn write(&self, text: &str) {
        let _ = io::stderr().write_all(text.as_bytes());
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}

/// The environment's output-stream slots.
///
/// Each slot holds the sink currently receiving that stream. The engine's
/// print/debug hooks write through here, so replacing a slot redirects the
/// stream without touching the engine itself.
pub struct StreamSlots {
    stdout: Mutex<Arc<dyn OutputSink>>,
    stderr: Mutex<Arc<dyn OutputSink>>,
}

impl StreamSlots {
    pub fn new(stdout: Arc<dyn OutputSink>, stderr: Arc<dyn OutputSink>) -> Self {
        Self {
            stdout: Mutex::new(stdout),
            stderr: Mutex::new(stderr),
        }
    }

    fn slot(slot: &Mutex<Arc<dyn OutputSink>>) -> MutexGuard<'_, Arc<dyn OutputSink>> {
        slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn write_out(&self, text: &str) {
        Self::slot(&self.stdout).write(text);
    }

    pub fn write_err(&self, text: &str) {
        Self::slot(&self.stderr).write(text);
    }

    /// The sink currently installed in the stdout slot.
    pub fn current_stdout(&self) -> Arc<dyn OutputSink> {
        Arc::clone(&Self::slot(&self.stdout))
    }

    pub fn current_stderr(&self) -> Arc<dyn OutputSink> {
        Arc::clone(&Self::slot(&self.stderr))
    }

    /// Points both slots at `sink`, returning a guard that restores the
    /// previous sinks when dropped. Restoration therefore happens on every
    /// exit path of the caller, panics included.
    pub fn redirect(&self, sink: Arc<dyn OutputSink>) -> RedirectGuard<'_> {
        let saved_stdout = std::mem::replace(&mut *Self::slot(&self.stdout), Arc::clone(&sink));
        let saved_stderr = std::mem::replace(&mut *Self::slot(&self.stderr), sink);
        RedirectGuard {
            slots: self,
            saved_stdout,
            saved_stderr,
        }
    }
}

impl Default for StreamSlots {
    fn default() -> Self {
        Self::new(Arc::new(StdoutSink), Arc::new(StderrSink))
    }
}

pub struct RedirectGuard<'a> {
    slots: &'a StreamSlots,
    saved_stdout: Arc<dyn OutputSink>,
    saved_stderr: Arc<dyn OutputSink>,
}

impl Drop for RedirectGuard<'_> {
    fn drop(&mut self) {
        *StreamSlots::slot(&self.slots.stdout) = Arc::clone(&self.saved_stdout);
        *StreamSlots::slot(&self.slots.stderr) = Arc::clone(&self.saved_stderr);
    }
}
