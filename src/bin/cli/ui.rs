use crate::app::{App, AppState};
use crate::constants::VERSION;
use crate::editor::editor_ui::render_editor;
use crate::theme::Theme;
use polypad::language::registry::registry::LanguageId;
use polypad::output::output::output::Transcript;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
};

const HELP_TEXT: &str = "\
F5 / Ctrl+R   Run the code
Ctrl+L        Choose language (resets the code)
Ctrl+O        Upload a file
Ctrl+S        Download as code.<ext>
Ctrl+Y        Copy code to clipboard
Ctrl+T        Next theme
Alt+Up/Down   Scroll output
Esc           Close popup / clear message
Ctrl+Q        Quit";

pub(crate) fn ui(f: &mut Frame, app: &mut App) {
    let theme = app.current_theme();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, app, theme, layout[0]);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(layout[1]);

    let title = app.session.document().file_name();
    render_editor(
        f,
        &mut app.editor,
        &app.tokens,
        theme,
        &title,
        app.state == AppState::Editing,
        main_chunks[0],
    );
    render_output(f, app, theme, main_chunks[1]);
    render_status_bar(f, app, theme, layout[2]);

    match app.state {
        AppState::Editing => {}
        AppState::LanguageSelector => render_language_selector(f, app, theme, layout[1]),
        AppState::UploadPicker => render_upload_picker(f, app, theme, layout[1]),
        AppState::Help => render_help(f, theme, layout[1]),
    }
}

fn render_header(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let title = format!(
        " polypad {} │ {} ",
        VERSION,
        app.session.language().label()
    );
    let header = Paragraph::new(Line::from(title)).style(
        Style::default()
            .fg(theme.text)
            .bg(theme.header_bg)
            .add_modifier(Modifier::BOLD),
    );
    f.render_widget(header, area);
}

/// Text shown in the output panel, wrapped to `width` columns.
pub(crate) fn output_lines(transcript: &Transcript, width: usize) -> Vec<String> {
    let width = width.max(1);
    transcript
        .display_text()
        .trim_end_matches('\n')
        .split('\n')
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                textwrap::wrap(line, width)
                    .into_iter()
                    .map(|l| l.into_owned())
                    .collect()
            }
        })
        .collect()
}

fn render_output(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            " Output ",
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(theme.muted))
        .style(Style::default().fg(theme.text).bg(theme.panel_bg));
    let inner = block.inner(area);

    let transcript = app.session.transcript();
    let placeholder = transcript.text().is_empty();
    let lines = output_lines(transcript, inner.width.saturating_sub(1) as usize);

    let max_scroll = lines.len().saturating_sub(inner.height as usize) as u16;
    app.output_scroll = app.output_scroll.min(max_scroll);

    let style = if placeholder {
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC)
    } else {
        Style::default().fg(theme.text)
    };
    let content: Vec<Line> = lines
        .into_iter()
        .map(|l| {
            let line_style = if l.starts_with("Error: ") {
                style.fg(ratatui::style::Color::Rgb(235, 100, 100))
            } else {
                style
            };
            Line::from(Span::styled(format!(" {}", l), line_style))
        })
        .collect();

    let paragraph = Paragraph::new(content)
        .block(block)
        .scroll((app.output_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let state = if app.session.is_running() {
        "● Running"
    } else {
        "● Idle"
    };
    let mut spans = vec![
        Span::styled(
            format!(" {} ", state),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("│ Ln {}, Col {} │ ", app.editor.cursor_row + 1, app.editor.cursor_char_col() + 1),
            Style::default().fg(theme.muted),
        ),
    ];
    match &app.notice {
        Some(notice) => {
            let style = if notice.is_error {
                Style::default()
                    .fg(ratatui::style::Color::Rgb(235, 100, 100))
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            spans.push(Span::styled(notice.text.clone(), style));
        }
        None => spans.push(Span::styled(
            "F5 run │ ^L language │ ^O upload │ ^S download │ ^Y copy │ F1 help",
            Style::default().fg(theme.muted),
        )),
    }
    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(theme.status_bg));
    f.render_widget(status, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn popup_block<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            title,
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().fg(theme.text).bg(theme.panel_bg))
}

fn highlight_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.bg)
        .bg(theme.accent)
        .add_modifier(Modifier::BOLD)
}

fn render_language_selector(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let rect = centered_rect(40, 40, area);
    f.render_widget(Clear, rect);
    let current = app.session.language();
    let items: Vec<ListItem> = LanguageId::ALL
        .iter()
        .map(|language| {
            let marker = if *language == current { "✓ " } else { "  " };
            ListItem::new(Line::from(vec![
                Span::raw(marker),
                Span::raw(language.label()),
                Span::styled(
                    format!("  {}", language.file_extension()),
                    Style::default().fg(theme.muted),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(popup_block(" Language (resets code) ", theme))
        .highlight_style(highlight_style(theme));
    f.render_stateful_widget(list, rect, &mut app.language_list_state);
}

fn render_upload_picker(f: &mut Frame, app: &mut App, theme: &Theme, area: Rect) {
    let rect = centered_rect(60, 70, area);
    f.render_widget(Clear, rect);
    let title = format!(" Upload: {} ", app.picker_dir.display());
    let items: Vec<ListItem> = app
        .picker_entries
        .iter()
        .map(|entry| {
            let name = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                entry.name.clone()
            };
            let style = if entry.is_dir {
                Style::default().fg(theme.accent)
            } else {
                Style::default().fg(theme.text)
            };
            ListItem::new(Span::styled(name, style))
        })
        .collect();
    let list = List::new(items)
        .block(popup_block(&title, theme))
        .highlight_style(highlight_style(theme));
    f.render_stateful_widget(list, rect, &mut app.picker_list_state);
}

fn render_help(f: &mut Frame, theme: &Theme, area: Rect) {
    let rect = centered_rect(60, 60, area);
    f.render_widget(Clear, rect);
    let p = Paragraph::new(HELP_TEXT)
        .block(popup_block(" Help ", theme))
        .wrap(Wrap { trim: false });
    f.render_widget(p, rect);
}
