use super::Color;

/// Colors for the playground chrome: editor pane, output pane, status line,
/// load progress bar.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    pub background: Color,
    pub foreground: Color,

    pub gutter: Color,
    pub gutter_active: Color,

    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub divider: Color,
    pub progress: Color,

    // Output styling
    pub success: Color,
    pub error: Color,
    pub info: Color,
}

fn hex(value: &str) -> Color {
    // All theme literals below are six-digit hex; a typo is a programmer
    // error caught by the builtin_themes_parse test.
    Color::from_hex(value).unwrap_or(Color::rgb(255, 255, 255))
}

impl Theme {
    /// Gruvbox Dark - warm retro theme
    pub fn gruvbox_dark() -> Self {
        Self {
            name: "gruvbox-dark".to_string(),
            background: hex("#282828"),
            foreground: hex("#ebdbb2"),
            gutter: hex("#665c54"),
            gutter_active: hex("#fabd2f"),
            status_bar_bg: hex("#3c3836"),
            status_bar_fg: hex("#ebdbb2"),
            divider: hex("#504945"),
            progress: hex("#b8bb26"),
            success: hex("#b8bb26"),
            error: hex("#fb4934"),
            info: hex("#83a598"),
        }
    }

    /// Nord - arctic, north-bluish color palette
    pub fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            background: hex("#2e3440"),
            foreground: hex("#d8dee9"),
            gutter: hex("#4c566a"),
            gutter_active: hex("#d8dee9"),
            status_bar_bg: hex("#3b4252"),
            status_bar_fg: hex("#d8dee9"),
            divider: hex("#4c566a"),
            progress: hex("#88c0d0"),
            success: hex("#a3be8c"),
            error: hex("#bf616a"),
            info: hex("#81a1c1"),
        }
    }

    /// Dracula - dark theme with vibrant colors
    pub fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            background: hex("#282a36"),
            foreground: hex("#f8f8f2"),
            gutter: hex("#6272a4"),
            gutter_active: hex("#f8f8f2"),
            status_bar_bg: hex("#44475a"),
            status_bar_fg: hex("#f8f8f2"),
            divider: hex("#44475a"),
            progress: hex("#bd93f9"),
            success: hex("#50fa7b"),
            error: hex("#ff5555"),
            info: hex("#8be9fd"),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "gruvbox-dark" => Some(Self::gruvbox_dark()),
            "nord" => Some(Self::nord()),
            "dracula" => Some(Self::dracula()),
            _ => None,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::gruvbox_dark()
    }
}
