//! finch::config - settings exposed to scripts
//!
//! Usage in Rhai:
//! ```rhai
//! finch::config::set_theme("nord");
//! finch::config::set_tab_width(2);
//! finch::config::set_word_wrap(false);
//! ```

use rhai::plugin::*;
use std::sync::{Arc, RwLock};

use crate::config::Settings;

/// Create the config module with access to settings
pub fn create_module(settings: Arc<RwLock<Settings>>) -> rhai::Module {
    let mut module = rhai::Module::new();

    // set_theme(name: &str)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_theme", move |name: &str| {
            if let Ok(mut settings) = s.write() {
                settings.theme = name.to_string();
            }
            Ok(())
        });
    }

    // get_theme() -> String
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_theme",
            move || -> Result<String, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.theme.clone()).unwrap_or_default())
            },
        );
    }

    // set_tab_width(width: i64)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_tab_width", move |width: i64| {
            if let Ok(mut settings) = s.write() {
                settings.tab_width = width.clamp(1, 8) as usize;
            }
            Ok(())
        });
    }

    // get_tab_width() -> i64
    {
        let s = Arc::clone(&settings);
        module.set_native_fn(
            "get_tab_width",
            move || -> Result<i64, Box<EvalAltResult>> {
                Ok(s.read().map(|s| s.tab_width as i64).unwrap_or(4))
            },
        );
    }

    // set_line_numbers(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_line_numbers", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.show_line_numbers = enabled;
            }
            Ok(())
        });
    }

    // set_word_wrap(enabled: bool)
    {
        let s = Arc::clone(&settings);
        module.set_native_fn("set_word_wrap", move |enabled: bool| {
            if let Ok(mut settings) = s.write() {
                settings.word_wrap = enabled;
            }
            Ok(())
        });
    }

    // list_themes() -> Array
    module.set_native_fn(
        "list_themes",
        || -> Result<rhai::Array, Box<EvalAltResult>> {
            Ok(crate::theme::builtin_names()
                .iter()
                .map(|s| rhai::Dynamic::from(s.to_string()))
                .collect())
        },
    );

    module
}

#[cfg(test)]
mod tests {
    use rhai::{Engine, Module};

    use super::*;

    fn setup() -> (Engine, Arc<RwLock<Settings>>) {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let mut engine = Engine::new();
        let mut app = Module::new();
        app.set_sub_module("config", create_module(Arc::clone(&settings)));
        engine.register_static_module("finch", app.into());
        (engine, settings)
    }

    #[test]
    fn set_theme_updates_settings() {
        let (engine, settings) = setup();
        engine.run(r#"finch::config::set_theme("dracula");"#).unwrap();
        assert_eq!(settings.read().unwrap().theme, "dracula");
    }

    #[test]
    fn set_tab_width_clamps_to_sane_range() {
        let (engine, settings) = setup();
        engine.run("finch::config::set_tab_width(99);").unwrap();
        assert_eq!(settings.read().unwrap().tab_width, 8);
        engine.run("finch::config::set_tab_width(0);").unwrap();
        assert_eq!(settings.read().unwrap().tab_width, 1);
    }

    #[test]
    fn display_toggles_round_trip() {
        let (engine, settings) = setup();
        engine
            .run(
                r#"
                finch::config::set_word_wrap(false);
                finch::config::set_line_numbers(false);
            "#,
            )
            .unwrap();
        let settings = settings.read().unwrap();
        assert!(!settings.word_wrap);
        assert!(!settings.show_line_numbers);
    }

    #[test]
    fn list_themes_returns_the_builtins() {
        let (engine, _) = setup();
        engine
            .run(
                r#"
                let themes = finch::config::list_themes();
                if themes.len() == 0 {
                    throw "no themes returned";
                }
            "#,
            )
            .unwrap();
    }

    #[test]
    fn getters_reflect_current_values() {
        let (engine, _) = setup();
        assert_eq!(
            engine.eval::<i64>("finch::config::get_tab_width()").unwrap(),
            4
        );
        assert_eq!(
            engine
                .eval::<String>("finch::config::get_theme()")
                .unwrap(),
            "gruvbox-dark"
        );
    }
}
