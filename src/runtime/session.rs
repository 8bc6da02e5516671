use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Instant;

use rhai::{Engine, Scope};
use tracing::debug;

use super::capture::{CaptureBuffer, OutputSink, StreamSlots};
use super::error::RunError;

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The script finished and wrote something.
    Success,
    /// The script finished without writing anything.
    SuccessEmpty,
    /// The engine raised an error; the message is the engine's, verbatim.
    Failure(String),
}

/// Produced once per run and consumed immediately by the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    /// Everything the script wrote to stdout/stderr, in write order. On a
    /// failed run this still holds whatever was written before the failure.
    pub captured: String,
    pub duration_ms: f64,
    pub outcome: Outcome,
}

/// The single execution context bridging the UI to the embedded engine.
///
/// One `Session` exists per process, created not-ready and initialized once
/// by the [`Loader`](super::Loader). At most one run is in flight at a time;
/// a second call while busy is rejected, never queued.
///
/// Top-level variables persist across runs: the scope lives as long as the
/// session, so `run("let x = 5;")` followed by `run("print(x)")` prints `5`.
pub struct Session {
    engine: OnceLock<Engine>,
    scope: Mutex<Scope<'static>>,
    streams: Arc<StreamSlots>,
    capture: Arc<CaptureBuffer>,
    ready: AtomicBool,
    busy: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            engine: OnceLock::new(),
            scope: Mutex::new(Scope::new()),
            streams: Arc::new(StreamSlots::default()),
            capture: Arc::new(CaptureBuffer::new()),
            ready: AtomicBool::new(false),
            busy: AtomicBool::new(false),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// The environment's output-stream slots. The loader wires the engine's
    /// print/debug hooks through these.
    pub fn streams(&self) -> &Arc<StreamSlots> {
        &self.streams
    }

    pub(crate) fn has_engine(&self) -> bool {
        self.engine.get().is_some()
    }

    /// Called by the loader after the engine is fully assembled. Flipping
    /// `ready` is the loader's terminal transition.
    pub(crate) fn install_engine(&self, engine: Engine) -> Result<(), super::LoadError> {
        self.engine
            .set(engine)
            .map_err(|_| super::LoadError::AlreadyInitialized)?;
        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    /// Runs `code` in the embedded engine, capturing everything it writes.
    ///
    /// Rejects with [`RunError::NotReady`] before initialization completes,
    /// [`RunError::EmptyInput`] when the trimmed source is empty (no stream
    /// redirection happens), and [`RunError::Busy`] while another run is in
    /// flight. Engine-level failures are reported through
    /// [`Outcome::Failure`], not as an `Err`, so the caller still receives
    /// any output captured before the failure.
    ///
    /// The stdout/stderr slots are restored on every exit path, including an
    /// evaluation panic. There is no timeout and no cancellation: a runaway
    /// script occupies the slot until it finishes.
    pub async fn run(self: Arc<Self>, code: &str) -> Result<ExecutionResult, RunError> {
        if !self.is_ready() {
            return Err(RunError::NotReady);
        }
        let code = code.trim();
        if code.is_empty() {
            return Err(RunError::EmptyInput);
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(RunError::Busy);
        }
        let _slot = BusyGuard(&self.busy);

        self.capture.clear();
        let redirect = self
            .streams
            .redirect(Arc::clone(&self.capture) as Arc<dyn OutputSink>);

        let started = Instant::now();
        let submitted = {
            let session = Arc::clone(&self);
            let source = code.to_string();
            tokio::task::spawn_blocking(move || session.evaluate(&source))
                .await
                .unwrap_or_else(|join_error| {
                    Err(RunError::ExecutionFailed(format!(
                        "evaluation aborted: {join_error}"
                    )))
                })
        };
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;

        // Read once, then put the original sinks back before reporting
        // anything to the caller.
        let captured = self.capture.take();
        drop(redirect);

        let outcome = match submitted {
            Ok(()) if captured.is_empty() => Outcome::SuccessEmpty,
            Ok(()) => Outcome::Success,
            Err(RunError::ExecutionFailed(message)) => Outcome::Failure(message),
            Err(other) => return Err(other),
        };

        debug!(duration_ms, ?outcome, bytes = captured.len(), "run finished");
        Ok(ExecutionResult {
            captured,
            duration_ms,
            outcome,
        })
    }

    /// Step 4 of the run protocol: hand the source to the engine. Runs on a
    /// blocking task so the UI keeps its event loop.
    fn evaluate(&self, source: &str) -> Result<(), RunError> {
        let engine = self.engine.get().ok_or(RunError::NotReady)?;
        let mut scope = self.scope.lock().unwrap_or_else(|e| e.into_inner());
        engine
            .run_with_scope(&mut scope, source)
            .map_err(|err| RunError::ExecutionFailed(err.to_string()))
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Clears the busy flag when the run leaves scope, whatever the exit path.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::RwLock;

    use super::super::Loader;
    use super::*;
    use crate::config::Settings;

    async fn ready_session() -> Arc<Session> {
        let session = Arc::new(Session::new());
        let loader = Loader::new(Arc::new(RwLock::new(Settings::default())))
            .with_startup_script(None);
        loader
            .initialize(&session, |_| {})
            .await
            .expect("loader should initialize");
        session
    }

    #[tokio::test]
    async fn run_before_initialization_is_rejected() {
        let session = Arc::new(Session::new());
        let result = Arc::clone(&session).run("print(1)").await;
        assert_eq!(result.unwrap_err(), RunError::NotReady);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn empty_input_is_rejected_without_side_effects() {
        let session = ready_session().await;
        let original_out = session.streams().current_stdout();

        session.capture.write("residue");
        for _ in 0..2 {
            let result = Arc::clone(&session).run("   \n\t  ").await;
            assert_eq!(result.unwrap_err(), RunError::EmptyInput);
        }

        // Neither the buffer nor the slots were touched.
        assert_eq!(session.capture.take(), "residue");
        assert!(Arc::ptr_eq(
            &session.streams().current_stdout(),
            &original_out
        ));
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn printed_output_is_captured() {
        let session = ready_session().await;
        let original_out = session.streams().current_stdout();

        let result = Arc::clone(&session).run(r#"print("hi")"#).await.unwrap();
        assert_eq!(result.outcome, Outcome::Success);
        assert_eq!(result.captured, "hi\n");
        assert!(result.duration_ms >= 0.0);

        // Completed runs leave the slots exactly as they found them.
        assert!(Arc::ptr_eq(
            &session.streams().current_stdout(),
            &original_out
        ));
    }

    #[tokio::test]
    async fn silent_script_reports_success_empty() {
        let session = ready_session().await;
        let result = Arc::clone(&session).run("let x = 5;").await.unwrap();
        assert_eq!(result.outcome, Outcome::SuccessEmpty);
        assert_eq!(result.captured, "");
    }

    #[tokio::test]
    async fn top_level_variables_persist_across_runs() {
        let session = ready_session().await;
        Arc::clone(&session).run("let x = 5;").await.unwrap();
        let result = Arc::clone(&session).run("print(x)").await.unwrap();
        assert_eq!(result.captured, "5\n");
    }

    #[tokio::test]
    async fn engine_error_becomes_failure_outcome() {
        let session = ready_session().await;
        let original_out = session.streams().current_stdout();
        let original_err = session.streams().current_stderr();

        let result = Arc::clone(&session).run("1/0").await.unwrap();
        match &result.outcome {
            Outcome::Failure(message) => {
                assert!(
                    message.to_lowercase().contains("zero"),
                    "unexpected message: {message}"
                );
            }
            other => panic!("expected failure, got {other:?}"),
        }

        // Streams restored and the session back to idle.
        assert!(Arc::ptr_eq(
            &session.streams().current_stdout(),
            &original_out
        ));
        assert!(Arc::ptr_eq(
            &session.streams().current_stderr(),
            &original_err
        ));
        assert!(!session.is_busy());

        let next = Arc::clone(&session).run(r#"print("still alive")"#).await.unwrap();
        assert_eq!(next.outcome, Outcome::Success);
    }

    #[tokio::test]
    async fn partial_output_survives_a_failure() {
        let session = ready_session().await;
        let result = Arc::clone(&session)
            .run(r#"print("before"); 1/0"#)
            .await
            .unwrap();
        assert!(matches!(result.outcome, Outcome::Failure(_)));
        assert_eq!(result.captured, "before\n");
    }

    #[tokio::test]
    async fn busy_session_rejects_a_second_run() {
        let session = ready_session().await;
        session.busy.store(true, Ordering::Release);
        let result = Arc::clone(&session).run("print(1)").await;
        assert_eq!(result.unwrap_err(), RunError::Busy);
        session.busy.store(false, Ordering::Release);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_run_is_rejected_while_first_is_in_flight() {
        let session = ready_session().await;

        let slow = tokio::spawn(Arc::clone(&session).run(
            "let n = 0; while n < 3_000_000 { n += 1; } print(n)",
        ));
        // Give the first run time to claim the slot.
        while !session.is_busy() {
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let second = Arc::clone(&session).run("print(2)").await;
        assert_eq!(second.unwrap_err(), RunError::Busy);

        let first = slow.await.unwrap().unwrap();
        assert_eq!(first.outcome, Outcome::Success);
        assert_eq!(first.captured, "3000000\n");
    }

    #[tokio::test]
    async fn stdout_and_stderr_interleave_in_write_order() {
        let session = ready_session().await;
        let result = Arc::clone(&session)
            .run(r#"print("a"); debug(42); print("c")"#)
            .await
            .unwrap();
        assert_eq!(result.captured, "a\n42\nc\n");
    }
}
