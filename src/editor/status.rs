/// Runtime lifecycle as shown in the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Initialization in progress, with the latest reported percentage.
    Loading(u8),
    Ready,
    Running,
    /// Initialization failed; permanent until the process restarts.
    LoadFailed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Loading(_) => "LOADING",
            Status::Ready => "READY",
            Status::Running => "RUNNING",
            Status::LoadFailed => "FAILED",
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Loading(0)
    }
}
