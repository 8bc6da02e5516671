use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use crate::config::Settings;
use crate::runtime::{ExecutionResult, LoadError, Outcome, RunError};

use super::samples::SAMPLES;
use super::{Buffer, Cursor, OutputKind, OutputView, Status};

const SEPARATOR_WIDTH: usize = 50;

/// Top-level UI state: the script buffer, the output pane, and the runtime
/// lifecycle as the user sees it. Consumes the bridge's load/run events and
/// turns them into output lines and status changes.
pub struct Editor {
    pub buffer: Buffer,
    pub cursor: Cursor,
    pub status: Status,
    pub output: OutputView,
    pub message: Option<String>,
    pub running: bool,
    pub scroll_offset: usize,
    pub col_offset: usize,
    /// Snapshot of the shared settings, refreshed after load and after each
    /// run (scripts may retune the editor through `finch::config`).
    pub settings: Settings,
    shared_settings: Arc<RwLock<Settings>>,
    pending_run: Option<String>,
    next_sample: usize,
    last_text_height: usize,
}

impl Editor {
    pub fn new(shared_settings: Arc<RwLock<Settings>>) -> Self {
        Self::with_buffer(Buffer::new(), shared_settings)
    }

    pub fn open(path: PathBuf, shared_settings: Arc<RwLock<Settings>>) -> io::Result<Self> {
        Ok(Self::with_buffer(Buffer::from_file(path)?, shared_settings))
    }

    fn with_buffer(buffer: Buffer, shared_settings: Arc<RwLock<Settings>>) -> Self {
        let settings = shared_settings
            .read()
            .map(|s| s.clone())
            .unwrap_or_default();
        Self {
            buffer,
            cursor: Cursor::new(),
            status: Status::default(),
            output: OutputView::new(),
            message: None,
            running: true,
            scroll_offset: 0,
            col_offset: 0,
            settings,
            shared_settings,
            pending_run: None,
            next_sample: 0,
            last_text_height: 0,
        }
    }

    pub fn sync_settings(&mut self) {
        if let Ok(shared) = self.shared_settings.read() {
            self.settings = shared.clone();
        }
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    // Run lifecycle

    /// Stages the buffer for execution. Refused while the runtime is not
    /// idle; the bridge's own precondition checks still back this up.
    pub fn request_run(&mut self) {
        match self.status {
            Status::Loading(_) => self.set_message("Runtime is still loading"),
            Status::LoadFailed => self.set_message("Runtime failed to load; restart to retry"),
            Status::Running => self.set_message("A script is already running"),
            Status::Ready => self.pending_run = Some(self.buffer.text()),
        }
    }

    pub fn take_run_request(&mut self) -> Option<String> {
        self.pending_run.take()
    }

    /// Called when a staged run is handed to the bridge. Empty input gets no
    /// banner; the bridge rejects it and the notice arrives with the result.
    pub fn on_run_started(&mut self, code: &str) {
        if code.trim().is_empty() {
            return;
        }
        self.status = Status::Running;
        self.output
            .append(&format!("{}\n", "=".repeat(SEPARATOR_WIDTH)), OutputKind::Success);
        self.output.append("Running code...\n\n", OutputKind::Plain);
    }

    pub fn on_run_finished(&mut self, result: Result<ExecutionResult, RunError>) {
        match result {
            Ok(result) => {
                match &result.outcome {
                    Outcome::Success => {
                        self.output.append(&result.captured, OutputKind::Plain);
                    }
                    Outcome::SuccessEmpty => {
                        self.output.append(
                            "Code executed successfully (no output)\n",
                            OutputKind::Success,
                        );
                    }
                    Outcome::Failure(message) => {
                        // Whatever was written before the failure still shows.
                        if !result.captured.is_empty() {
                            self.output.append(&result.captured, OutputKind::Plain);
                        }
                        self.output
                            .append(&format!("Error: {message}\n"), OutputKind::Error);
                    }
                }
                if !matches!(result.outcome, Outcome::Failure(_)) {
                    self.output.append(
                        &format!("\nExecution completed in {:.2}ms\n", result.duration_ms),
                        OutputKind::Success,
                    );
                }
                self.status = Status::Ready;
                self.sync_settings();
            }
            Err(RunError::EmptyInput) => {
                self.output.append("No code to run.\n", OutputKind::Error);
            }
            Err(RunError::Busy) => self.set_message("A script is already running"),
            Err(RunError::NotReady) => self.set_message("Runtime is not ready"),
            Err(RunError::ExecutionFailed(message)) => {
                // The bridge folds these into Outcome::Failure; render sanely
                // anyway if one ever surfaces.
                self.output
                    .append(&format!("Error: {message}\n"), OutputKind::Error);
                self.status = Status::Ready;
            }
        }
    }

    pub fn on_load_progress(&mut self, pct: u8) {
        if let Status::Loading(current) = self.status {
            self.status = Status::Loading(current.max(pct));
        }
    }

    pub fn on_load_finished(&mut self, result: &Result<(), LoadError>) {
        match result {
            Ok(()) => {
                self.status = Status::Ready;
                self.sync_settings();
                self.output.append(
                    "Rhai runtime loaded successfully!\nYou can now run scripts.\n\n",
                    OutputKind::Success,
                );
            }
            Err(err) => {
                self.status = Status::LoadFailed;
                self.output
                    .append(&format!("Error loading runtime: {err}\n"), OutputKind::Error);
            }
        }
    }

    // Editor operations

    pub fn clear_editor(&mut self) {
        self.buffer.clear();
        self.cursor = Cursor::new();
        self.scroll_offset = 0;
        self.col_offset = 0;
    }

    pub fn clear_output(&mut self) {
        self.output.clear();
    }

    /// Cycles the next embedded sample script into the buffer.
    pub fn load_sample(&mut self) {
        let sample = SAMPLES[self.next_sample % SAMPLES.len()];
        self.next_sample += 1;
        self.buffer.set_text(sample);
        self.cursor = Cursor::new();
        self.scroll_offset = 0;
        self.col_offset = 0;
        self.set_message("Sample loaded - Ctrl-R runs it");
    }

    pub fn toggle_word_wrap(&mut self) {
        if let Ok(mut shared) = self.shared_settings.write() {
            shared.word_wrap = !shared.word_wrap;
        }
        self.sync_settings();
        self.set_message(if self.settings.word_wrap {
            "Word wrap on"
        } else {
            "Word wrap off"
        });
    }

    pub fn save(&mut self) {
        if self.buffer.path().is_none() {
            self.set_message("No file attached to this buffer");
            return;
        }
        match self.buffer.save() {
            Ok(_) => self.set_message("Written"),
            Err(e) => self.set_message(format!("Error: {e}")),
        }
    }

    pub fn scroll_output_up(&mut self, rows: usize) {
        self.output.scroll_up(rows);
    }

    pub fn scroll_output_down(&mut self, rows: usize) {
        self.output.scroll_down(rows);
    }

    // Cursor motion

    pub fn move_left(&mut self) {
        self.cursor.move_left();
    }

    pub fn move_right(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.move_right(line_len);
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            let target_len = self.buffer.line_len(self.cursor.line - 1);
            self.cursor.move_up(target_len);
        }
    }

    pub fn move_down(&mut self) {
        let line_count = self.buffer.line_count();
        if self.cursor.line + 1 < line_count {
            let target_len = self.buffer.line_len(self.cursor.line + 1);
            self.cursor.move_down(line_count, target_len);
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.line_start();
    }

    pub fn move_to_line_end(&mut self) {
        let line_len = self.buffer.line_len(self.cursor.line);
        self.cursor.line_end(line_len);
    }

    pub fn page_up(&mut self) {
        for _ in 0..self.page_size() {
            self.move_up();
        }
    }

    pub fn page_down(&mut self) {
        for _ in 0..self.page_size() {
            self.move_down();
        }
    }

    fn page_size(&self) -> usize {
        self.last_text_height.max(1)
    }

    // Text editing

    pub fn insert_char(&mut self, ch: char) {
        self.buffer
            .insert_char(self.cursor.line, self.cursor.col, ch);
        self.cursor.move_to(self.cursor.line, self.cursor.col + 1);
    }

    pub fn insert_tab(&mut self) {
        let spaces = " ".repeat(self.settings.tab_width.max(1));
        self.buffer
            .insert_str(self.cursor.line, self.cursor.col, &spaces);
        self.cursor
            .move_to(self.cursor.line, self.cursor.col + spaces.len());
    }

    pub fn insert_newline(&mut self) {
        self.buffer
            .insert_newline(self.cursor.line, self.cursor.col);
        self.cursor.move_to(self.cursor.line + 1, 0);
    }

    pub fn delete_backward(&mut self) {
        if self.cursor.col > 0 {
            self.buffer
                .delete_char_backward(self.cursor.line, self.cursor.col);
            self.cursor.move_to(self.cursor.line, self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            let prev_line_len = self.buffer.line_len(self.cursor.line - 1);
            self.buffer.delete_char_backward(self.cursor.line, 0);
            self.cursor.move_to(self.cursor.line - 1, prev_line_len);
        }
    }

    /// Keeps the cursor inside the viewport, scrolling vertically and
    /// horizontally as needed.
    pub fn adjust_scroll(&mut self, text_height: usize, text_width: usize) {
        self.last_text_height = text_height;

        if self.cursor.line < self.scroll_offset {
            self.scroll_offset = self.cursor.line;
        }
        if text_height > 0 && self.cursor.line >= self.scroll_offset + text_height {
            self.scroll_offset = self.cursor.line - text_height + 1;
        }

        if self.cursor.col < self.col_offset {
            self.col_offset = self.cursor.col;
        }
        if text_width > 0 && self.cursor.col >= self.col_offset + text_width {
            self.col_offset = self.cursor.col - text_width + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_with_text(s: &str) -> Editor {
        let settings = Arc::new(RwLock::new(Settings::default()));
        let mut editor = Editor::new(settings);
        editor.buffer = Buffer::from_text(s);
        editor
    }

    fn ready_editor_with_text(s: &str) -> Editor {
        let mut editor = editor_with_text(s);
        editor.status = Status::Ready;
        editor
    }

    fn output_texts(editor: &Editor) -> Vec<String> {
        editor
            .output
            .lines()
            .iter()
            .map(|l| l.text.clone())
            .collect()
    }

    #[test]
    fn new_editor_starts_loading() {
        let editor = editor_with_text("");
        assert_eq!(editor.status, Status::Loading(0));
        assert!(editor.running);
    }

    #[test]
    fn request_run_while_loading_is_refused_with_a_message() {
        let mut editor = editor_with_text("print(1)");
        editor.request_run();
        assert!(editor.take_run_request().is_none());
        assert!(editor.message.is_some());
    }

    #[test]
    fn request_run_when_ready_stages_the_buffer() {
        let mut editor = ready_editor_with_text("print(1)");
        editor.request_run();
        assert_eq!(editor.take_run_request().as_deref(), Some("print(1)"));
        assert!(editor.take_run_request().is_none());
    }

    #[test]
    fn request_run_while_running_is_refused() {
        let mut editor = ready_editor_with_text("print(1)");
        editor.status = Status::Running;
        editor.request_run();
        assert!(editor.take_run_request().is_none());
        assert_eq!(editor.message.as_deref(), Some("A script is already running"));
    }

    #[test]
    fn run_start_prints_the_banner_and_flips_to_running() {
        let mut editor = ready_editor_with_text("print(1)");
        editor.on_run_started("print(1)");
        assert_eq!(editor.status, Status::Running);
        let texts = output_texts(&editor);
        assert_eq!(texts[0], "=".repeat(50));
        assert_eq!(texts[1], "Running code...");
    }

    #[test]
    fn run_start_with_blank_code_shows_no_banner() {
        let mut editor = ready_editor_with_text("   ");
        editor.on_run_started("   ");
        assert_eq!(editor.status, Status::Ready);
        assert!(editor.output.is_empty());
    }

    #[test]
    fn successful_run_shows_output_and_timing() {
        let mut editor = ready_editor_with_text("print(\"hi\")");
        editor.status = Status::Running;
        editor.on_run_finished(Ok(ExecutionResult {
            captured: "hi\n".to_string(),
            duration_ms: 1.5,
            outcome: Outcome::Success,
        }));
        assert_eq!(editor.status, Status::Ready);
        let texts = output_texts(&editor);
        assert_eq!(texts[0], "hi");
        assert!(texts.iter().any(|t| t.contains("Execution completed in")));
    }

    #[test]
    fn silent_run_shows_the_no_output_notice() {
        let mut editor = ready_editor_with_text("let x = 5;");
        editor.status = Status::Running;
        editor.on_run_finished(Ok(ExecutionResult {
            captured: String::new(),
            duration_ms: 0.2,
            outcome: Outcome::SuccessEmpty,
        }));
        let texts = output_texts(&editor);
        assert_eq!(texts[0], "Code executed successfully (no output)");
    }

    #[test]
    fn failed_run_shows_partial_output_then_the_error() {
        let mut editor = ready_editor_with_text("print(\"x\"); 1/0");
        editor.status = Status::Running;
        editor.on_run_finished(Ok(ExecutionResult {
            captured: "x\n".to_string(),
            duration_ms: 0.3,
            outcome: Outcome::Failure("Division by zero".to_string()),
        }));
        assert_eq!(editor.status, Status::Ready);
        let texts = output_texts(&editor);
        assert_eq!(texts[0], "x");
        assert_eq!(texts[1], "Error: Division by zero");
        // No timing footer on a failed run.
        assert!(!texts.iter().any(|t| t.contains("Execution completed")));
    }

    #[test]
    fn empty_input_rejection_prints_the_notice() {
        let mut editor = ready_editor_with_text("");
        editor.on_run_finished(Err(RunError::EmptyInput));
        assert_eq!(output_texts(&editor), vec!["No code to run."]);
        assert_eq!(editor.status, Status::Ready);
    }

    #[test]
    fn busy_rejection_leaves_the_running_status_alone() {
        let mut editor = ready_editor_with_text("print(1)");
        editor.status = Status::Running;
        editor.on_run_finished(Err(RunError::Busy));
        assert_eq!(editor.status, Status::Running);
        assert!(editor.message.is_some());
    }

    #[test]
    fn load_progress_is_monotonic_for_the_ui() {
        let mut editor = editor_with_text("");
        editor.on_load_progress(60);
        editor.on_load_progress(20); // stale report
        assert_eq!(editor.status, Status::Loading(60));
    }

    #[test]
    fn load_finished_shows_the_welcome_banner() {
        let mut editor = editor_with_text("");
        editor.on_load_finished(&Ok(()));
        assert_eq!(editor.status, Status::Ready);
        assert!(output_texts(&editor)[0].contains("loaded successfully"));
    }

    #[test]
    fn load_failure_is_permanent_and_visible() {
        let mut editor = editor_with_text("");
        editor.on_load_finished(&Err(LoadError::StartupScript("boom".to_string())));
        assert_eq!(editor.status, Status::LoadFailed);
        assert!(output_texts(&editor)[0].contains("boom"));
        editor.request_run();
        assert!(editor.take_run_request().is_none());
    }

    #[test]
    fn load_sample_cycles_through_the_embedded_scripts() {
        let mut editor = ready_editor_with_text("");
        editor.load_sample();
        let first = editor.buffer.text();
        editor.load_sample();
        let second = editor.buffer.text();
        assert_ne!(first, second);
        assert_eq!((editor.cursor.line, editor.cursor.col), (0, 0));
    }

    #[test]
    fn toggle_word_wrap_updates_the_shared_settings() {
        let mut editor = editor_with_text("");
        assert!(editor.settings.word_wrap);
        editor.toggle_word_wrap();
        assert!(!editor.settings.word_wrap);
        assert!(!editor.shared_settings.read().unwrap().word_wrap);
    }

    #[test]
    fn insert_and_delete_track_the_cursor() {
        let mut editor = ready_editor_with_text("");
        editor.insert_char('h');
        editor.insert_char('i');
        assert_eq!(editor.buffer.text(), "hi");
        assert_eq!(editor.cursor.col, 2);
        editor.delete_backward();
        assert_eq!(editor.buffer.text(), "h");
        assert_eq!(editor.cursor.col, 1);
    }

    #[test]
    fn insert_tab_uses_the_configured_width() {
        let mut editor = ready_editor_with_text("");
        editor.settings.tab_width = 2;
        editor.insert_tab();
        assert_eq!(editor.buffer.text(), "  ");
        assert_eq!(editor.cursor.col, 2);
    }

    #[test]
    fn delete_backward_at_line_start_joins_lines() {
        let mut editor = ready_editor_with_text("ab\ncd");
        editor.cursor.move_to(1, 0);
        editor.delete_backward();
        assert_eq!(editor.buffer.text(), "abcd");
        assert_eq!((editor.cursor.line, editor.cursor.col), (0, 2));
    }

    #[test]
    fn adjust_scroll_follows_the_cursor_down() {
        let mut editor = ready_editor_with_text("1\n2\n3\n4\n5\n6\n7\n8\n9\n10");
        editor.cursor.move_to(8, 0);
        editor.adjust_scroll(5, 80);
        assert_eq!(editor.scroll_offset, 4);
    }

    #[test]
    fn adjust_scroll_follows_the_cursor_right() {
        let mut editor = ready_editor_with_text("a long line of text here");
        editor.cursor.move_to(0, 20);
        editor.adjust_scroll(5, 10);
        assert_eq!(editor.col_offset, 11);
        editor.cursor.move_to(0, 3);
        editor.adjust_scroll(5, 10);
        assert_eq!(editor.col_offset, 3);
    }
}
