/// Editor settings, customizable from the Rhai startup script via
/// `finch::config::*`. Shared behind `Arc<RwLock<_>>` so a running script can
/// retune the editor too; the UI refreshes its snapshot after each load and
/// run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: String,
    pub show_line_numbers: bool,
    /// Soft-wraps long lines in the output pane; off means truncation.
    pub word_wrap: bool,
    /// Spaces inserted per Tab press.
    pub tab_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "gruvbox-dark".to_string(),
            show_line_numbers: true,
            word_wrap: true,
            tab_width: 4,
        }
    }
}
