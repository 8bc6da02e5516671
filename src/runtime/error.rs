use thiserror::Error;

/// Fatal initialization failure. The session stays permanently not-ready;
/// recovering requires restarting the process.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("runtime already initialized")]
    AlreadyInitialized,

    #[error("unknown library `{0}`")]
    UnknownLibrary(String),

    #[error("startup script failed: {0}")]
    StartupScript(String),

    #[error("failed to read startup script: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-call failure of [`Session::run`](super::Session::run).
///
/// The first three are rejected preconditions with no side effects.
/// `ExecutionFailed` wraps the engine's own error verbatim; `run` folds it
/// into [`Outcome::Failure`](super::Outcome) so partial captured output still
/// reaches the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunError {
    #[error("runtime is not ready")]
    NotReady,

    #[error("a script is already running")]
    Busy,

    #[error("nothing to run")]
    EmptyInput,

    #[error("{0}")]
    ExecutionFailed(String),
}
