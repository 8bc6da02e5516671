/// Caret position with a sticky column: vertical motion remembers the column
/// the user was aiming for, so stepping through a short line and back onto a
/// long one returns to the original column.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    desired_col: usize,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an exact position, resetting the sticky column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.line = line;
        self.col = col;
        self.desired_col = col;
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        }
        self.desired_col = self.col;
    }

    pub fn move_right(&mut self, line_len: usize) {
        if self.col < line_len {
            self.col += 1;
        }
        self.desired_col = self.col;
    }

    /// `target_len` is the length of the line above.
    pub fn move_up(&mut self, target_len: usize) {
        if self.line > 0 {
            self.line -= 1;
            self.col = self.desired_col.min(target_len);
        }
    }

    /// `target_len` is the length of the line below.
    pub fn move_down(&mut self, line_count: usize, target_len: usize) {
        if self.line + 1 < line_count {
            self.line += 1;
            self.col = self.desired_col.min(target_len);
        }
    }

    pub fn line_start(&mut self) {
        self.col = 0;
        self.desired_col = 0;
    }

    pub fn line_end(&mut self, line_len: usize) {
        self.col = line_len;
        self.desired_col = line_len;
    }
}
