use ropey::Rope;
use std::{fs::File, io, path::PathBuf};

/// The script being edited. A rope keeps edits cheap even for large pastes;
/// the whole text is extracted once per run when it is handed to the bridge.
pub struct Buffer {
    text: Rope,
    filepath: Option<PathBuf>,
    dirty: bool,
}

impl Buffer {
    pub fn new() -> Self {
        Self {
            text: Rope::new(),
            filepath: None,
            dirty: false,
        }
    }

    pub fn from_file(path: PathBuf) -> io::Result<Self> {
        let text = Rope::from_reader(File::open(&path)?)?;
        Ok(Self {
            text,
            filepath: Some(path),
            dirty: false,
        })
    }

    pub fn from_text(s: &str) -> Self {
        Self {
            text: Rope::from_str(s),
            filepath: None,
            dirty: false,
        }
    }

    pub fn save(&mut self) -> io::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(path) = &self.filepath {
            let mut file = File::create(path)?;
            self.text.write_to(&mut file)?;
            self.dirty = false;
            Ok(())
        } else {
            Err(io::Error::other("no file path"))
        }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.filepath.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The complete source text, as handed to the execution bridge.
    pub fn text(&self) -> String {
        self.text.to_string()
    }

    /// Replaces the whole buffer (sample loading, clear).
    pub fn set_text(&mut self, s: &str) {
        self.text = Rope::from_str(s);
        self.dirty = true;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn line_count(&self) -> usize {
        self.text.len_lines()
    }

    pub fn line(&self, idx: usize) -> ropey::RopeSlice<'_> {
        self.text.line(idx)
    }

    /// Length excluding the newline character.
    pub fn line_len(&self, idx: usize) -> usize {
        let line = self.text.line(idx);
        let len = line.len_chars();
        if len > 0 && line.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        self.text.line_to_char(line) + col
    }

    pub fn insert_char(&mut self, line: usize, col: usize, ch: char) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert_char(idx, ch);
        self.dirty = true;
    }

    pub fn insert_str(&mut self, line: usize, col: usize, s: &str) {
        let idx = self.line_col_to_char(line, col);
        self.text.insert(idx, s);
        self.dirty = true;
    }

    pub fn insert_newline(&mut self, line: usize, col: usize) {
        self.insert_char(line, col, '\n');
    }

    /// Deletes the character before (line, col); at a line start this joins
    /// with the previous line.
    pub fn delete_char_backward(&mut self, line: usize, col: usize) {
        let idx = self.line_col_to_char(line, col);
        if idx > 0 {
            self.text.remove(idx - 1..idx);
            self.dirty = true;
        }
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty() {
        let buf = Buffer::new();
        assert_eq!(buf.line_count(), 1); // empty rope has 1 line
        assert_eq!(buf.text(), "");
    }

    #[test]
    fn line_len_excludes_newline() {
        let buf = Buffer::from_text("hello\nworld");
        assert_eq!(buf.line_len(0), 5);
        assert_eq!(buf.line_len(1), 5); // no trailing newline
    }

    #[test]
    fn line_len_handles_empty_lines() {
        let buf = Buffer::from_text("hello\n\nworld");
        assert_eq!(buf.line_len(1), 0);
    }

    #[test]
    fn set_text_replaces_everything() {
        let mut buf = Buffer::from_text("old content");
        buf.set_text("let x = 1;\nprint(x)");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.text(), "let x = 1;\nprint(x)");
        assert!(buf.is_dirty());
    }

    #[test]
    fn insert_str_lands_mid_line() {
        let mut buf = Buffer::from_text("ab\ncd");
        buf.insert_str(1, 1, "    ");
        assert_eq!(buf.text(), "ab\nc    d");
    }

    #[test]
    fn delete_backward_joins_lines() {
        let mut buf = Buffer::from_text("ab\ncd");
        buf.delete_char_backward(1, 0);
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn delete_backward_at_origin_is_a_noop() {
        let mut buf = Buffer::from_text("ab");
        buf.delete_char_backward(0, 0);
        assert_eq!(buf.text(), "ab");
        assert!(!buf.is_dirty());
    }

    #[test]
    fn save_without_path_fails() {
        let mut buf = Buffer::from_text("x");
        buf.set_text("y");
        assert!(buf.save().is_err());
    }
}
