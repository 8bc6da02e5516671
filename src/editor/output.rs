/// Styling class for a line in the output pane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Captured script output.
    Plain,
    /// Banners, separators, timing footers.
    Success,
    /// Error messages and rejection notices.
    Error,
}

#[derive(Debug, Clone)]
pub struct OutputLine {
    pub text: String,
    pub kind: OutputKind,
}

/// The output pane: an append-only list of styled lines, anchored to the
/// tail like a terminal, with a scroll-back offset counted in display rows
/// from the bottom.
#[derive(Default)]
pub struct OutputView {
    lines: Vec<OutputLine>,
    scroll_back: usize,
}

impl OutputView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `text`, splitting it into lines. A trailing newline ends the
    /// last line rather than opening an empty one; interior and leading
    /// newlines produce blank lines, so the classic `"\nDone\n"` footer
    /// renders with its blank spacer.
    pub fn append(&mut self, text: &str, kind: OutputKind) {
        let mut parts: Vec<&str> = text.split('\n').collect();
        if parts.len() > 1 && parts.last() == Some(&"") {
            parts.pop();
        }
        for part in parts {
            self.lines.push(OutputLine {
                text: part.to_string(),
                kind,
            });
        }
        // New content re-anchors the view to the tail.
        self.scroll_back = 0;
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.scroll_back = 0;
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    pub fn scroll_up(&mut self, rows: usize) {
        let limit = self.lines.len().saturating_sub(1);
        self.scroll_back = (self.scroll_back + rows).min(limit);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(rows);
    }

    /// Display rows for a pane `width` columns wide: long lines soft-wrap
    /// when `wrap` is on and are truncated otherwise.
    pub fn rows(&self, width: usize, wrap: bool) -> Vec<(String, OutputKind)> {
        let mut rows = Vec::with_capacity(self.lines.len());
        for line in &self.lines {
            if wrap && width > 0 {
                for chunk in wrap_chars(&line.text, width) {
                    rows.push((chunk, line.kind));
                }
            } else {
                rows.push((line.text.chars().take(width).collect(), line.kind));
            }
        }
        rows
    }
}

/// Splits `text` into chunks of at most `width` characters; an empty line
/// still yields one (empty) row.
fn wrap_chars(text: &str, width: usize) -> Vec<String> {
    if text.is_empty() {
        return vec![String::new()];
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
