//! Native modules exposed to scripts.
//!
//! Two kinds live here:
//! - preloaded libraries (`math::*`, `text::*`), registered for every
//!   session the way the original environment preinstalled its packages;
//! - the `finch` namespace (`finch::config::*`), which lets the startup
//!   script — or a running script — retune the editor.

pub mod config;
mod math;
mod text;

use rhai::Engine;

use super::error::LoadError;

/// Registers the named library modules as static namespaces.
pub(crate) fn register_libraries(engine: &mut Engine, names: &[&str]) -> Result<(), LoadError> {
    for name in names {
        let module = match *name {
            "math" => math::create_module(),
            "text" => text::create_module(),
            other => return Err(LoadError::UnknownLibrary(other.to_string())),
        };
        engine.register_static_module(*name, module.into());
    }
    Ok(())
}
