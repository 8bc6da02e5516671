mod colors;
mod theme;

pub use colors::Color;
pub use theme::Theme;

/// Names accepted by `finch::config::set_theme`.
pub fn builtin_names() -> &'static [&'static str] {
    &["gruvbox-dark", "nord", "dracula"]
}
