use std::io::{self, Write, stdout};

use crossterm::{
    cursor::{Hide, MoveTo, SetCursorStyle, Show},
    execute, queue,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};

use crate::editor::{Editor, OutputKind, Status};
use crate::theme::Theme;

const MIN_OUTPUT_ROWS: u16 = 5;

/// Full-screen layout, top to bottom: editor pane, divider, output pane,
/// status line.
pub struct Renderer {
    pub width: u16,
    pub height: u16,
}

impl Renderer {
    pub fn new() -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self { width, height })
    }

    pub fn setup() -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            DisableLineWrap,
            Hide,
            Clear(ClearType::All)
        )?;
        Ok(())
    }

    pub fn teardown() -> io::Result<()> {
        execute!(
            stdout(),
            SetCursorStyle::DefaultUserShape,
            Show,
            EnableLineWrap,
            LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    fn output_rows(&self) -> u16 {
        (self.height / 3).max(MIN_OUTPUT_ROWS)
    }

    /// Rows available to the editor pane.
    pub fn text_height(&self) -> usize {
        self.height.saturating_sub(self.output_rows() + 2) as usize
    }

    fn gutter_width(&self, editor: &Editor) -> usize {
        if !editor.settings.show_line_numbers {
            return 0;
        }
        digits(editor.buffer.line_count()).max(3) + 1
    }

    /// Columns available to editor text, after the line-number gutter.
    pub fn text_width(&self, editor: &Editor) -> usize {
        (self.width as usize).saturating_sub(self.gutter_width(editor))
    }

    pub fn render(&self, editor: &Editor, theme: &Theme) -> io::Result<()> {
        let mut stdout = stdout();

        // Hide cursor during redraw to prevent flicker
        queue!(stdout, Hide)?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;

        let editor_rows = self.text_height() as u16;
        self.render_editor_pane(&mut stdout, editor, theme, editor_rows)?;
        self.render_divider(&mut stdout, editor, theme, editor_rows)?;
        self.render_output_pane(&mut stdout, editor, theme, editor_rows + 1)?;
        self.render_status_line(&mut stdout, editor, theme)?;
        self.position_cursor(&mut stdout, editor, editor_rows)?;

        stdout.flush()?;
        Ok(())
    }

    fn render_editor_pane(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
        rows: u16,
    ) -> io::Result<()> {
        let line_count = editor.buffer.line_count();
        let gutter_width = self.gutter_width(editor);
        let text_width = (self.width as usize).saturating_sub(gutter_width);

        for row in 0..rows {
            let line_idx = row as usize + editor.scroll_offset;
            queue!(stdout, MoveTo(0, row))?;

            if line_idx < line_count {
                if gutter_width > 0 {
                    let color = if line_idx == editor.cursor.line {
                        theme.gutter_active
                    } else {
                        theme.gutter
                    };
                    queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
                    queue!(
                        stdout,
                        Print(format!("{:>width$} ", line_idx + 1, width = gutter_width - 1))
                    )?;
                }

                let line = editor.buffer.line(line_idx);
                let content: String = line
                    .chars()
                    .skip(editor.col_offset)
                    .take(text_width)
                    .collect();
                let content = content.trim_end_matches('\n');
                let padded: String = format!("{content:<text_width$}")
                    .chars()
                    .take(text_width)
                    .collect();

                queue!(stdout, SetForegroundColor(theme.foreground.to_crossterm()))?;
                queue!(stdout, Print(&padded))?;
            } else {
                // Past the end of the buffer
                queue!(stdout, SetForegroundColor(theme.gutter.to_crossterm()))?;
                if gutter_width > 0 {
                    queue!(
                        stdout,
                        Print(format!("{:>width$} ", "~", width = gutter_width - 1))
                    )?;
                }
                queue!(stdout, Print(" ".repeat(text_width)))?;
            }
        }

        Ok(())
    }

    fn render_divider(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
        row: u16,
    ) -> io::Result<()> {
        let label = if editor.settings.word_wrap {
            " OUTPUT (wrap) "
        } else {
            " OUTPUT "
        };
        let width = self.width as usize;
        let mut divider = format!("──{label}");
        while divider.chars().count() < width {
            divider.push('─');
        }
        let divider: String = divider.chars().take(width).collect();

        queue!(stdout, MoveTo(0, row))?;
        queue!(stdout, SetForegroundColor(theme.divider.to_crossterm()))?;
        queue!(stdout, Print(divider))?;
        Ok(())
    }

    fn render_output_pane(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
        start_row: u16,
    ) -> io::Result<()> {
        let pane_height = self.height.saturating_sub(start_row + 1);
        let width = self.width as usize;

        if let Status::Loading(pct) = editor.status {
            return self.render_progress(stdout, theme, pct, start_row, pane_height);
        }

        let rows = editor
            .output
            .rows(width, editor.settings.word_wrap);
        let visible = pane_height as usize;
        let max_back = rows.len().saturating_sub(visible);
        let start = max_back - editor.output.scroll_back().min(max_back);

        for row in 0..pane_height {
            queue!(stdout, MoveTo(0, start_row + row))?;
            match rows.get(start + row as usize) {
                Some((text, kind)) => {
                    let color = match kind {
                        OutputKind::Plain => theme.foreground,
                        OutputKind::Success => theme.success,
                        OutputKind::Error => theme.error,
                    };
                    queue!(stdout, SetForegroundColor(color.to_crossterm()))?;
                    let padded: String = format!("{text:<width$}").chars().take(width).collect();
                    queue!(stdout, Print(padded))?;
                }
                None => {
                    queue!(stdout, Print(" ".repeat(width)))?;
                }
            }
        }
        Ok(())
    }

    fn render_progress(
        &self,
        stdout: &mut impl Write,
        theme: &Theme,
        pct: u8,
        start_row: u16,
        pane_height: u16,
    ) -> io::Result<()> {
        let width = self.width as usize;
        for row in 0..pane_height {
            queue!(stdout, MoveTo(0, start_row + row))?;
            queue!(stdout, Print(" ".repeat(width)))?;
        }

        let middle = start_row + pane_height / 2;
        let message = "Loading Rhai runtime...";
        let bar_width = width.saturating_sub(10).clamp(10, 40);
        let filled = bar_width * pct.min(100) as usize / 100;
        let bar = format!(
            "[{}{}] {:>3}%",
            "#".repeat(filled),
            "-".repeat(bar_width - filled),
            pct
        );

        queue!(stdout, SetForegroundColor(theme.info.to_crossterm()))?;
        let x = (width.saturating_sub(message.chars().count()) / 2) as u16;
        queue!(stdout, MoveTo(x, middle.saturating_sub(1)))?;
        queue!(stdout, Print(message))?;

        queue!(stdout, SetForegroundColor(theme.progress.to_crossterm()))?;
        let x = (width.saturating_sub(bar.chars().count()) / 2) as u16;
        queue!(stdout, MoveTo(x, middle))?;
        queue!(stdout, Print(bar))?;
        Ok(())
    }

    fn render_status_line(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        theme: &Theme,
    ) -> io::Result<()> {
        let status_row = self.height.saturating_sub(1);
        queue!(stdout, MoveTo(0, status_row))?;

        // Message - show prominently
        if let Some(ref msg) = editor.message {
            queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
            queue!(stdout, SetForegroundColor(theme.info.to_crossterm()))?;
            queue!(stdout, Clear(ClearType::CurrentLine))?;
            let msg: String = msg.chars().take(self.width as usize).collect();
            queue!(stdout, Print(msg))?;
            return Ok(());
        }

        queue!(stdout, SetBackgroundColor(theme.status_bar_bg.to_crossterm()))?;
        queue!(stdout, SetForegroundColor(theme.status_bar_fg.to_crossterm()))?;

        let filename = editor
            .buffer
            .path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "[scratch]".to_string());
        let dirty = if editor.buffer.is_dirty() { " [+]" } else { "" };

        let left = format!(" {} | {}{} ", editor.status.label(), filename, dirty);
        let right = format!(
            " ^R run  ^E sample  ^W wrap  ^Q quit | Ln {}, Col {} ",
            editor.cursor.line + 1,
            editor.cursor.col + 1
        );

        let width = self.width as usize;
        let padding = width.saturating_sub(left.chars().count() + right.chars().count());
        let status: String = format!("{}{}{}", left, " ".repeat(padding), right)
            .chars()
            .take(width)
            .collect();

        queue!(stdout, Print(status))?;
        queue!(stdout, SetBackgroundColor(theme.background.to_crossterm()))?;
        Ok(())
    }

    fn position_cursor(
        &self,
        stdout: &mut impl Write,
        editor: &Editor,
        editor_rows: u16,
    ) -> io::Result<()> {
        let gutter_width = self.gutter_width(editor);
        if editor.cursor.line < editor.scroll_offset || editor.cursor.col < editor.col_offset {
            queue!(stdout, Hide)?;
            return Ok(());
        }

        let y = (editor.cursor.line - editor.scroll_offset) as u16;
        let x = (gutter_width + editor.cursor.col - editor.col_offset) as u16;
        if y < editor_rows && x < self.width {
            queue!(stdout, MoveTo(x, y))?;
            queue!(stdout, SetCursorStyle::BlinkingBar)?;
            queue!(stdout, Show)?;
        } else {
            queue!(stdout, Hide)?;
        }
        Ok(())
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
