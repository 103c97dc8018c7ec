mod app;
mod command;
mod constants;
mod editor;
mod handlers;
mod syntax;
mod theme;
mod ui;

use app::{App, AppState};
use command::{parse_cmd_args, run_cmd_mode, USAGE};
use crossterm::{
    event::{self, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use handlers::{handle_editing_key, handle_help_key, handle_language_selector_key, handle_upload_picker_key};
use polypad::language::registry::registry::LanguageId;
use polypad::util::config::config::Config;
use polypad::util::logging::logging;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io::stdout, time::Duration};
use tracing::info;
use ui::ui;

fn main() -> Result<(), Box<dyn Error>> {
    let args = match parse_cmd_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("\n{}", USAGE);
            std::process::exit(2);
        }
    };
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let loaded = Config::load_from(&Config::path());
    if let Err(e) = logging::init(&Config::log_file_for(&loaded)) {
        eprintln!("Warning: logging disabled: {}", e);
    }
    let config = Config::or_default(loaded);

    let rt = tokio::runtime::Runtime::new()?;

    if let Some(path) = args.run {
        return rt.block_on(run_cmd_mode(path, args.language, &config));
    }

    let language = args
        .language
        .or_else(|| args.open.as_deref().and_then(LanguageId::from_path))
        .unwrap_or(config.default_language);
    info!(language = %language, "starting editor");

    let mut app = App::new(config, language, rt.handle().clone());
    if args.open.is_some() {
        app.upload(args.open);
    }

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!(running = app.session.is_running(), "editor closed");
    drop(app);
    shutdown(rt);
    result
}

/// Stop the runtime without waiting on blocking workers, so quitting during
/// a runaway script does not hang until its timeout.
fn shutdown(rt: tokio::runtime::Runtime) {
    rt.shutdown_background();
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        app.process_events();
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(16))? {
            let evt = event::read()?;
            if let event::Event::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    break;
                }

                match app.state {
                    AppState::Editing => match handle_editing_key(app, key) {
                        Err(e) if e.to_string() == "quit" => break,
                        other => other?,
                    },
                    AppState::LanguageSelector => handle_language_selector_key(app, key),
                    AppState::UploadPicker => handle_upload_picker_key(app, key),
                    AppState::Help => handle_help_key(app, key),
                }
            }
        }
    }
    Ok(())
}
