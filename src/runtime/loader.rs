use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use rhai::{Engine, Module};
use tracing::{info, warn};

use super::api;
use super::capture::StreamSlots;
use super::error::LoadError;
use super::session::Session;
use crate::config::Settings;

/// Library modules preloaded into every engine, by name. The analog of the
/// original environment's preinstalled packages.
pub const DEFAULT_LIBRARIES: &[&str] = &["math", "text"];

// Progress checkpoints reported during initialization. Monotonic; the final
// report on success is always exactly 100.
const PROGRESS_ENGINE_READY: u8 = 20;
const PROGRESS_LIBRARIES_LOADED: u8 = 60;
const PROGRESS_SHIM_INSTALLED: u8 = 90;
const PROGRESS_READY: u8 = 100;

/// One-shot initializer for the embedded runtime.
///
/// Builds the engine, registers the preloaded libraries and the
/// `finch::config` namespace, wires the print/debug hooks through the
/// session's stream slots, evaluates the user's startup script, and installs
/// the finished engine into the session. Any failure is fatal: the session
/// stays not-ready and no retry is attempted.
pub struct Loader {
    settings: Arc<RwLock<Settings>>,
    startup_script: Option<PathBuf>,
}

impl Loader {
    pub fn new(settings: Arc<RwLock<Settings>>) -> Self {
        Self {
            settings,
            startup_script: Self::startup_script_path(),
        }
    }

    /// Overrides (or disables) the startup script location.
    pub fn with_startup_script(mut self, path: Option<PathBuf>) -> Self {
        self.startup_script = path;
        self
    }

    /// Uses ~/.config/finch/ on all platforms for consistency.
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("finch"))
    }

    pub fn startup_script_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("init.rhai"))
    }

    /// Initializes `session`, reporting progress percentages through
    /// `progress` at each checkpoint.
    pub async fn initialize<F>(&self, session: &Session, mut progress: F) -> Result<(), LoadError>
    where
        F: FnMut(u8) + Send,
    {
        if session.has_engine() {
            return Err(LoadError::AlreadyInitialized);
        }

        let mut engine = Engine::new();
        // Parse-depth cap protects the host stack; execution itself is
        // unbudgeted, so a runaway script holds the slot until it finishes.
        engine.set_max_expr_depths(128, 64);
        progress(PROGRESS_ENGINE_READY);

        api::register_libraries(&mut engine, DEFAULT_LIBRARIES)?;
        let mut app = Module::new();
        app.set_sub_module("config", api::config::create_module(Arc::clone(&self.settings)));
        engine.register_static_module("finch", app.into());
        progress(PROGRESS_LIBRARIES_LOADED);

        install_output_hooks(&mut engine, Arc::clone(session.streams()));
        progress(PROGRESS_SHIM_INSTALLED);

        if let Some(path) = &self.startup_script {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                let source = tokio::fs::read_to_string(path).await?;
                engine.run(&source).map_err(|err| {
                    warn!(path = %path.display(), %err, "startup script failed");
                    LoadError::StartupScript(err.to_string())
                })?;
                info!(path = %path.display(), "startup script applied");
            }
        }

        session.install_engine(engine)?;
        progress(PROGRESS_READY);
        info!(libraries = ?DEFAULT_LIBRARIES, "runtime ready");
        Ok(())
    }
}

/// Installs the capture shim: every print lands in the stdout slot and every
/// debug in the stderr slot, each as one newline-terminated write. The slots
/// decide where the text actually goes.
fn install_output_hooks(engine: &mut Engine, slots: Arc<StreamSlots>) {
    let out = Arc::clone(&slots);
    engine.on_print(move |text| out.write_out(&format!("{text}\n")));
    engine.on_debug(move |text, _source, _pos| slots.write_err(&format!("{text}\n")));
}
