use crate::editor::editor::EditorBuffer;
use crate::theme::{theme_at, Theme, THEMES};
use polypad::engine::engine::engine::{RunEvent, RunOutcome};
use polypad::language::highlight::highlight::{Highlighter, Token};
use polypad::language::registry::registry::LanguageId;
use polypad::session::session::session::Session;
use polypad::transfer::clipboard::clipboard::SystemClipboard;
use polypad::transfer::upload::upload::{list_dir, spawn_upload, PickerEntry, UploadEvent};
use polypad::util::config::config::Config;
use ratatui::widgets::ListState;
use std::env;
use std::path::PathBuf;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{info, warn};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AppState {
    Editing,
    LanguageSelector,
    UploadPicker,
    Help,
}

/// One-line message for the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

impl Notice {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

pub struct App {
    pub(crate) state: AppState,
    pub(crate) session: Session,
    pub(crate) editor: EditorBuffer,
    pub(crate) tokens: Vec<Vec<Token>>,
    pub(crate) config: Config,
    pub(crate) theme_index: usize,
    pub(crate) notice: Option<Notice>,
    pub(crate) language_list_state: ListState,
    pub(crate) picker_dir: PathBuf,
    pub(crate) picker_entries: Vec<PickerEntry>,
    pub(crate) picker_list_state: ListState,
    pub(crate) output_scroll: u16,
    highlighter: Highlighter,
    clipboard: SystemClipboard,
    handle: Handle,
    run_tx: mpsc::UnboundedSender<RunEvent>,
    run_rx: mpsc::UnboundedReceiver<RunEvent>,
    upload_tx: mpsc::UnboundedSender<UploadEvent>,
    upload_rx: mpsc::UnboundedReceiver<UploadEvent>,
}

impl App {
    pub(crate) fn new(config: Config, language: LanguageId, handle: Handle) -> Self {
        let (run_tx, run_rx) = mpsc::unbounded_channel();
        let (upload_tx, upload_rx) = mpsc::unbounded_channel();
        let session = Session::new(language, config.limits());
        let editor = EditorBuffer::new(session.document().text());
        let picker_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let mut app = Self {
            state: AppState::Editing,
            editor,
            tokens: Vec::new(),
            theme_index: config.theme_index % THEMES.len(),
            config,
            notice: None,
            language_list_state: ListState::default(),
            picker_dir,
            picker_entries: Vec::new(),
            picker_list_state: ListState::default(),
            output_scroll: 0,
            highlighter: Highlighter::new(language.highlight_mode()),
            clipboard: SystemClipboard::new(),
            handle,
            run_tx,
            run_rx,
            upload_tx,
            upload_rx,
            session,
        };
        app.refresh_highlight();
        app
    }

    pub(crate) fn current_theme(&self) -> &'static Theme {
        theme_at(self.theme_index)
    }

    fn refresh_highlight(&mut self) {
        self.tokens = self.highlighter.highlight(self.session.document().text());
    }

    /// Push the editor buffer into the document after an edit.
    pub(crate) fn sync_text(&mut self) {
        self.session.set_text(self.editor.text());
        self.refresh_highlight();
    }

    /// Reload the editor from the document after it was replaced wholesale.
    fn reload_editor(&mut self) {
        self.editor.set_text(self.session.document().text());
        self.refresh_highlight();
    }

    pub(crate) fn run_code(&mut self) {
        match self.session.start_run(&self.handle, self.run_tx.clone()) {
            Ok(_) => {
                self.output_scroll = 0;
                self.notice = None;
            }
            Err(e) => {
                warn!(error = %e, "run rejected");
                self.notice = Some(Notice::error(e.to_string()));
            }
        }
    }

    /// Drain background results. Called once per frame.
    pub(crate) fn process_events(&mut self) {
        while let Ok(event) = self.run_rx.try_recv() {
            let faulted = matches!(
                &event,
                RunEvent::Finished {
                    outcome: RunOutcome::Faulted(_),
                    ..
                }
            );
            let finished = matches!(event, RunEvent::Finished { .. });
            if self.session.apply_run_event(event) && finished {
                self.notice = Some(if faulted {
                    Notice::error("Run finished with an error")
                } else {
                    Notice::info("Run finished")
                });
            }
        }

        while let Ok(UploadEvent { path, result }) = self.upload_rx.try_recv() {
            match self.session.apply_upload(result) {
                Ok(()) => {
                    self.reload_editor();
                    self.notice = Some(Notice::info(format!("Loaded {}", path.display())));
                }
                Err(e) => self.notice = Some(Notice::error(e.to_string())),
            }
        }
    }

    pub(crate) fn open_language_selector(&mut self) {
        self.language_list_state
            .select(Some(self.session.language().position()));
        self.state = AppState::LanguageSelector;
    }

    pub(crate) fn select_language(&mut self) {
        let idx = self.language_list_state.selected().unwrap_or(0);
        if let Some(language) = LanguageId::ALL.get(idx).copied() {
            self.switch_language(language);
        }
        self.state = AppState::Editing;
    }

    pub(crate) fn switch_language(&mut self, language: LanguageId) {
        self.session.set_language(language);
        self.highlighter = Highlighter::new(language.highlight_mode());
        self.output_scroll = 0;
        self.reload_editor();
        self.notice = Some(Notice::info(format!("Switched to {}", language.label())));
    }

    pub(crate) fn open_upload_picker(&mut self) {
        self.refresh_picker();
        self.state = AppState::UploadPicker;
    }

    fn refresh_picker(&mut self) {
        self.picker_entries = list_dir(&self.picker_dir);
        let selected = (!self.picker_entries.is_empty()).then_some(0);
        self.picker_list_state.select(selected);
    }

    /// Enter on a picker entry: descend into directories, upload files.
    pub(crate) fn picker_enter(&mut self) {
        let Some(entry) = self
            .picker_list_state
            .selected()
            .and_then(|idx| self.picker_entries.get(idx))
            .cloned()
        else {
            return;
        };
        if entry.is_dir {
            self.picker_dir = entry.path;
            self.refresh_picker();
        } else {
            self.upload(Some(entry.path));
            self.state = AppState::Editing;
        }
    }

    pub(crate) fn cancel_upload(&mut self) {
        self.upload(None);
        self.state = AppState::Editing;
    }

    pub(crate) fn upload(&mut self, path: Option<PathBuf>) {
        if spawn_upload(&self.handle, path, self.upload_tx.clone()) {
            self.notice = Some(Notice::info("Loading..."));
        }
    }

    pub(crate) fn copy_source(&mut self) {
        self.notice = Some(match self.session.copy_to(&mut self.clipboard) {
            Ok(()) => Notice::info("Copied to clipboard"),
            Err(e) => Notice::error(e.to_string()),
        });
    }

    pub(crate) fn download_source(&mut self) {
        let dir = self.config.download_dir();
        self.notice = Some(match self.session.download_to(&dir) {
            Ok(path) => Notice::info(format!("Saved {}", path.display())),
            Err(e) => {
                warn!(error = %e, "download failed");
                Notice::error(e.to_string())
            }
        });
    }

    pub(crate) fn next_theme(&mut self) {
        self.theme_index = (self.theme_index + 1) % THEMES.len();
        self.config.theme_index = self.theme_index;
        let name = self.current_theme().name;
        info!(theme = name, "theme changed");
        self.notice = Some(match self.config.save() {
            Ok(()) => Notice::info(format!("Theme: {}", name)),
            Err(e) => {
                warn!(error = %e, "could not save config");
                Notice::error(e.to_string())
            }
        });
    }

    pub(crate) fn scroll_output(&mut self, delta: i32) {
        self.output_scroll = (self.output_scroll as i32 + delta).max(0) as u16;
    }
}

#[cfg(test)]
mod tests {
    use super::{App, AppState};
    use polypad::language::registry::registry::LanguageId;
    use polypad::util::config::config::Config;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::runtime::Runtime;

    fn app(rt: &Runtime) -> App {
        App::new(Config::default(), LanguageId::JavaScript, rt.handle().clone())
    }

    fn pump(app: &mut App, until: impl Fn(&App) -> bool) {
        for _ in 0..200 {
            app.process_events();
            if until(app) {
                return;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        panic!("background work did not finish");
    }

    #[test]
    fn edits_flow_into_the_document() {
        let rt = Runtime::new().unwrap();
        let mut app = app(&rt);
        app.editor.set_text("");
        app.editor.insert_str("console.log(1+1)");
        app.sync_text();
        assert_eq!(app.session.document().text(), "console.log(1+1)");
        assert_eq!(app.tokens.len(), 1);
    }

    #[test]
    fn run_output_arrives_through_process_events() {
        let rt = Runtime::new().unwrap();
        let mut app = app(&rt);
        app.editor.set_text("console.log(1+1)");
        app.sync_text();
        app.run_code();
        pump(&mut app, |a| !a.session.is_running() && !a.session.transcript().in_progress());
        assert_eq!(app.session.transcript().text(), "2\n");
        assert_eq!(app.notice.as_ref().map(|n| n.text.as_str()), Some("Run finished"));
    }

    #[test]
    fn switching_language_reloads_editor() {
        let rt = Runtime::new().unwrap();
        let mut app = app(&rt);
        app.open_language_selector();
        assert_eq!(app.state, AppState::LanguageSelector);
        app.language_list_state.select(Some(LanguageId::Python.position()));
        app.select_language();
        assert_eq!(app.state, AppState::Editing);
        assert_eq!(app.session.language(), LanguageId::Python);
        assert_eq!(app.editor.text(), LanguageId::Python.starter_text());
    }

    #[test]
    fn picker_upload_replaces_editor_text() {
        let rt = Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::write(dir.path().join("demo.py"), "test-content").unwrap();

        let mut app = app(&rt);
        app.picker_dir = dir.path().to_path_buf();
        app.open_upload_picker();
        let names: Vec<_> = app.picker_entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["..", "demo.py"]);
        app.picker_list_state.select(Some(1));
        app.picker_enter();
        pump(&mut app, |a| a.editor.text() == "test-content");
        assert_eq!(app.session.language(), LanguageId::JavaScript);
    }

    #[test]
    fn cancelled_picker_changes_nothing() {
        let rt = Runtime::new().unwrap();
        let mut app = app(&rt);
        let before = app.editor.text();
        app.open_upload_picker();
        app.cancel_upload();
        app.process_events();
        assert_eq!(app.state, AppState::Editing);
        assert_eq!(app.editor.text(), before);
        assert!(app.notice.is_none());
    }

    #[test]
    fn download_goes_to_configured_dir() {
        let rt = Runtime::new().unwrap();
        let dir = TempDir::new().unwrap();
        let config = Config {
            download_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        let mut app = App::new(config, LanguageId::Java, rt.handle().clone());
        app.download_source();
        let saved = fs::read_to_string(dir.path().join("code.java")).unwrap();
        assert_eq!(saved, LanguageId::Java.starter_text());
        assert!(!app.notice.unwrap().is_error);
    }
}
