use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::editor::Editor;

/// Rows scrolled per output-scroll keypress.
const OUTPUT_SCROLL_STEP: usize = 3;

pub fn handle_event(editor: &mut Editor, event: Event) {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            // Any keypress clears a transient status message.
            editor.clear_message();
            handle_key(editor, key);
        }
        Event::Resize(_, _) => {
            // The main loop resizes the renderer.
        }
        _ => {}
    }
}

fn handle_key(editor: &mut Editor, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        handle_shortcut(editor, key);
        return;
    }

    match key.code {
        KeyCode::Char(c) => editor.insert_char(c),
        KeyCode::Enter => editor.insert_newline(),
        KeyCode::Tab => editor.insert_tab(),
        KeyCode::Backspace => editor.delete_backward(),

        KeyCode::Left => editor.move_left(),
        KeyCode::Right => editor.move_right(),
        KeyCode::Up => editor.move_up(),
        KeyCode::Down => editor.move_down(),
        KeyCode::Home => editor.move_to_line_start(),
        KeyCode::End => editor.move_to_line_end(),
        KeyCode::PageUp => editor.page_up(),
        KeyCode::PageDown => editor.page_down(),

        _ => {}
    }
}

fn handle_shortcut(editor: &mut Editor, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => editor.quit(),
        // Some terminals deliver Ctrl-Enter, most don't; Ctrl-R always works.
        KeyCode::Char('r') | KeyCode::Enter => editor.request_run(),
        KeyCode::Char('e') => editor.load_sample(),
        KeyCode::Char('n') => editor.clear_editor(),
        KeyCode::Char('l') => editor.clear_output(),
        KeyCode::Char('w') => editor.toggle_word_wrap(),
        KeyCode::Char('s') => editor.save(),
        KeyCode::Up => editor.scroll_output_up(OUTPUT_SCROLL_STEP),
        KeyCode::Down => editor.scroll_output_down(OUTPUT_SCROLL_STEP),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, RwLock};

    use crossterm::event::KeyEventState;

    use super::*;
    use crate::config::Settings;
    use crate::editor::Status;

    fn editor() -> Editor {
        let mut editor = Editor::new(Arc::new(RwLock::new(Settings::default())));
        editor.status = Status::Ready;
        editor
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn plain_characters_go_into_the_buffer() {
        let mut editor = editor();
        handle_event(&mut editor, key(KeyCode::Char('o'), KeyModifiers::NONE));
        handle_event(&mut editor, key(KeyCode::Char('k'), KeyModifiers::NONE));
        assert_eq!(editor.buffer.text(), "ok");
    }

    #[test]
    fn ctrl_r_stages_a_run() {
        let mut editor = editor();
        handle_event(&mut editor, key(KeyCode::Char('x'), KeyModifiers::NONE));
        handle_event(&mut editor, key(KeyCode::Char('r'), KeyModifiers::CONTROL));
        assert_eq!(editor.take_run_request().as_deref(), Some("x"));
    }

    #[test]
    fn ctrl_q_quits() {
        let mut editor = editor();
        handle_event(&mut editor, key(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!editor.running);
    }

    #[test]
    fn key_release_events_are_ignored() {
        let mut editor = editor();
        handle_event(
            &mut editor,
            Event::Key(KeyEvent {
                code: KeyCode::Char('z'),
                modifiers: KeyModifiers::NONE,
                kind: KeyEventKind::Release,
                state: KeyEventState::NONE,
            }),
        );
        assert_eq!(editor.buffer.text(), "");
    }
}
