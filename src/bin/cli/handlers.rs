use crate::app::{App, AppState};
use crate::constants::PAGE_ROWS;
use crate::editor::editor_handlers::handle_editor_key;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use polypad::language::registry::registry::LanguageId;
use std::error::Error;

/// Bindings that work from the editor regardless of focus. Returns `true`
/// when the key was consumed.
fn handle_global_key(app: &mut App, key: KeyEvent) -> Result<bool, Box<dyn Error>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::F(5) => app.run_code(),
        KeyCode::F(1) => app.state = AppState::Help,
        KeyCode::Char('q') if ctrl => return Err("quit".into()),
        KeyCode::Char('r') if ctrl => app.run_code(),
        KeyCode::Char('l') if ctrl => app.open_language_selector(),
        KeyCode::Char('o') if ctrl => app.open_upload_picker(),
        KeyCode::Char('s') if ctrl => app.download_source(),
        KeyCode::Char('y') if ctrl => app.copy_source(),
        KeyCode::Char('t') if ctrl => app.next_theme(),
        KeyCode::Up if alt => app.scroll_output(-1),
        KeyCode::Down if alt => app.scroll_output(1),
        KeyCode::PageUp if alt => app.scroll_output(-(PAGE_ROWS as i32)),
        KeyCode::PageDown if alt => app.scroll_output(PAGE_ROWS as i32),
        _ => return Ok(false),
    }
    Ok(true)
}

pub(crate) fn handle_editing_key(app: &mut App, key: KeyEvent) -> Result<(), Box<dyn Error>> {
    if handle_global_key(app, key)? {
        return Ok(());
    }
    if key.code == KeyCode::Esc {
        app.notice = None;
        return Ok(());
    }
    if handle_editor_key(&mut app.editor, key) {
        app.sync_text();
    }
    Ok(())
}

pub(crate) fn handle_language_selector_key(app: &mut App, key: KeyEvent) {
    let len = LanguageId::ALL.len();
    match key.code {
        KeyCode::Esc => app.state = AppState::Editing,
        KeyCode::Enter => app.select_language(),
        KeyCode::Char('j') | KeyCode::Down => {
            let i = (app.language_list_state.selected().unwrap_or(0) + 1).min(len - 1);
            app.language_list_state.select(Some(i));
        }
        KeyCode::Char('k') | KeyCode::Up => {
            let i = app.language_list_state.selected().unwrap_or(0).saturating_sub(1);
            app.language_list_state.select(Some(i));
        }
        _ => {}
    }
}

pub(crate) fn handle_upload_picker_key(app: &mut App, key: KeyEvent) {
    let len = app.picker_entries.len();
    match key.code {
        KeyCode::Esc => app.cancel_upload(),
        KeyCode::Enter => app.picker_enter(),
        KeyCode::Down | KeyCode::Char('j') if len > 0 => {
            let i = (app.picker_list_state.selected().unwrap_or(0) + 1).min(len - 1);
            app.picker_list_state.select(Some(i));
        }
        KeyCode::Up | KeyCode::Char('k') if len > 0 => {
            let i = app.picker_list_state.selected().unwrap_or(0).saturating_sub(1);
            app.picker_list_state.select(Some(i));
        }
        KeyCode::Backspace | KeyCode::Left => {
            // Same as choosing the ".." entry.
            if app.picker_entries.first().is_some_and(|e| e.name == "..") {
                app.picker_list_state.select(Some(0));
                app.picker_enter();
            }
        }
        _ => {}
    }
}

pub(crate) fn handle_help_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::F(1)) {
        app.state = AppState::Editing;
    }
}

#[cfg(test)]
mod tests {
    use super::{handle_editing_key, handle_language_selector_key};
    use crate::app::{App, AppState};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use polypad::language::registry::registry::LanguageId;
    use polypad::util::config::config::Config;
    use tokio::runtime::Runtime;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_q_quits() {
        let rt = Runtime::new().unwrap();
        let mut app = App::new(Config::default(), LanguageId::JavaScript, rt.handle().clone());
        let err = handle_editing_key(&mut app, key(KeyCode::Char('q'), KeyModifiers::CONTROL)).unwrap_err();
        assert_eq!(err.to_string(), "quit");
    }

    #[test]
    fn typed_keys_reach_the_document() {
        let rt = Runtime::new().unwrap();
        let mut app = App::new(Config::default(), LanguageId::JavaScript, rt.handle().clone());
        app.editor.set_text("");
        app.sync_text();
        for c in "1+1".chars() {
            handle_editing_key(&mut app, key(KeyCode::Char(c), KeyModifiers::NONE)).unwrap();
        }
        assert_eq!(app.session.document().text(), "1+1");
    }

    #[test]
    fn language_selector_navigates_and_applies() {
        let rt = Runtime::new().unwrap();
        let mut app = App::new(Config::default(), LanguageId::JavaScript, rt.handle().clone());
        handle_editing_key(&mut app, key(KeyCode::Char('l'), KeyModifiers::CONTROL)).unwrap();
        assert_eq!(app.state, AppState::LanguageSelector);
        for _ in 0..5 {
            handle_language_selector_key(&mut app, key(KeyCode::Down, KeyModifiers::NONE));
        }
        handle_language_selector_key(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.session.language(), *LanguageId::ALL.last().unwrap());
        assert_eq!(app.state, AppState::Editing);
    }
}
