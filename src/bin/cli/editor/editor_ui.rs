use crate::editor::editor::EditorBuffer;
use crate::syntax::styled_spans;
use crate::theme::Theme;
use polypad::language::highlight::highlight::Token;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Draw the editor panel: a bordered block with a line-number gutter and the
/// highlighted buffer. `tokens` holds one token list per buffer line.
pub fn render_editor(
    f: &mut Frame,
    editor: &mut EditorBuffer,
    tokens: &[Vec<Token>],
    theme: &Theme,
    title: &str,
    show_cursor: bool,
    area: Rect,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {} ", title),
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
        ))
        .border_style(Style::default().fg(theme.muted))
        .style(Style::default().fg(theme.text).bg(theme.bg));
    let inner = block.inner(area);
    f.render_widget(block, area);

    editor.ensure_cursor_visible(inner.width as usize, inner.height as usize);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(editor.line_numbers_width as u16 + 1),
            Constraint::Min(1),
        ])
        .split(inner);

    render_line_numbers(f, editor, theme, chunks[0]);
    render_content(f, editor, tokens, theme, chunks[1]);

    if show_cursor {
        let cursor_x = chunks[1].x + 1 + editor.cursor_display_col() as u16;
        let cursor_y = chunks[1].y + (editor.cursor_row - editor.scroll_offset) as u16;
        if cursor_x < chunks[1].x + chunks[1].width && cursor_y < chunks[1].y + chunks[1].height {
            f.set_cursor_position((cursor_x, cursor_y));
        }
    }
}

fn render_line_numbers(f: &mut Frame, editor: &EditorBuffer, theme: &Theme, area: Rect) {
    let height = area.height as usize;
    let visible_start = editor.scroll_offset;
    let visible_end = (visible_start + height).min(editor.lines.len());

    let lines: Vec<Line> = (visible_start..visible_end)
        .map(|i| {
            let style = if i == editor.cursor_row {
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.muted)
            };
            Line::from(Span::styled(
                format!("{:width$}", i + 1, width = editor.line_numbers_width),
                style,
            ))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(theme.muted))
        .style(Style::default().bg(theme.bg));
    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Right);
    f.render_widget(paragraph, area);
}

fn render_content(f: &mut Frame, editor: &EditorBuffer, tokens: &[Vec<Token>], theme: &Theme, area: Rect) {
    let height = area.height as usize;
    let visible_start = editor.scroll_offset;
    let visible_end = (visible_start + height).min(editor.lines.len());

    let lines: Vec<Line> = (visible_start..visible_end)
        .map(|i| {
            let line = &editor.lines[i];
            let line_tokens = tokens.get(i).map(|t| t.as_slice()).unwrap_or(&[]);
            let mut spans = vec![Span::raw(" ")];
            spans.extend(styled_spans(line, line_tokens, editor.horizontal_scroll, theme));
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().fg(theme.text).bg(theme.bg));
    f.render_widget(paragraph, area);
}
