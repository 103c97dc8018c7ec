use crate::constants::PAGE_ROWS;
use crate::editor::editor::EditorBuffer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Apply a key to the buffer. Returns `true` when the text changed.
/// Keys with Ctrl or Alt held are left to the app-level bindings.
pub fn handle_editor_key(editor: &mut EditorBuffer, key: KeyEvent) -> bool {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        match key.code {
            KeyCode::Home => editor.move_to_file_start(),
            KeyCode::End => editor.move_to_file_end(),
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char(c) => {
            editor.insert_char(c);
            true
        }
        KeyCode::Enter => {
            editor.insert_newline();
            true
        }
        KeyCode::Tab => {
            editor.insert_tab();
            true
        }
        KeyCode::Backspace => {
            let before = (editor.cursor_row, editor.cursor_col);
            editor.delete_char();
            before != (editor.cursor_row, editor.cursor_col)
        }
        KeyCode::Delete => {
            let line_count = editor.lines.len();
            let line_len = editor.lines[editor.cursor_row].len();
            editor.delete_char_forward();
            line_count != editor.lines.len() || line_len != editor.lines[editor.cursor_row].len()
        }
        KeyCode::Left => {
            editor.move_left();
            false
        }
        KeyCode::Right => {
            editor.move_right();
            false
        }
        KeyCode::Up => {
            editor.move_up();
            false
        }
        KeyCode::Down => {
            editor.move_down();
            false
        }
        KeyCode::Home => {
            editor.move_to_line_start();
            false
        }
        KeyCode::End => {
            editor.move_to_line_end();
            false
        }
        KeyCode::PageUp => {
            editor.page_up(PAGE_ROWS);
            false
        }
        KeyCode::PageDown => {
            editor.page_down(PAGE_ROWS);
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::handle_editor_key;
    use crate::editor::editor::EditorBuffer;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(editor: &mut EditorBuffer, code: KeyCode) -> bool {
        handle_editor_key(editor, KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn typing_reports_a_change() {
        let mut editor = EditorBuffer::new("");
        assert!(press(&mut editor, KeyCode::Char('x')));
        assert!(press(&mut editor, KeyCode::Enter));
        assert!(press(&mut editor, KeyCode::Tab));
        assert_eq!(editor.text(), "x\n    ");
    }

    #[test]
    fn motion_and_no_op_deletes_report_no_change() {
        let mut editor = EditorBuffer::new("ab");
        assert!(!press(&mut editor, KeyCode::Right));
        assert!(press(&mut editor, KeyCode::Backspace));
        editor.move_to_file_start();
        assert!(!press(&mut editor, KeyCode::Backspace));
        editor.move_to_file_end();
        assert!(!press(&mut editor, KeyCode::Delete));
        assert_eq!(editor.text(), "b");
    }

    #[test]
    fn control_chords_do_not_type() {
        let mut editor = EditorBuffer::new("");
        let changed = handle_editor_key(
            &mut editor,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL),
        );
        assert!(!changed);
        assert_eq!(editor.text(), "");
    }
}
