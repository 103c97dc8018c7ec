use crate::theme::Theme;
use polypad::language::highlight::highlight::{Token, TokenKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;

fn style_for_kind(kind: TokenKind, theme: &Theme) -> Style {
    let base = Style::default().bg(theme.bg);
    match kind {
        TokenKind::Comment => base.fg(Color::Rgb(100, 100, 120)).add_modifier(Modifier::ITALIC),
        TokenKind::Keyword => base.fg(theme.accent).add_modifier(Modifier::BOLD),
        TokenKind::String => base.fg(Color::Rgb(150, 200, 150)),
        TokenKind::Number => base.fg(Color::Rgb(180, 200, 255)),
        TokenKind::Function => base.fg(Color::Rgb(200, 180, 100)),
        TokenKind::Type => base.fg(Color::Rgb(100, 200, 255)),
        TokenKind::Constant => base.fg(Color::Rgb(255, 200, 100)),
        TokenKind::Normal => base.fg(theme.text),
    }
}

/// Turn one line and its tokens into styled spans. `skip_chars` drops that
/// many leading characters for horizontal scrolling. Bytes not covered by a
/// token get the normal style.
pub fn styled_spans(line: &str, tokens: &[Token], skip_chars: usize, theme: &Theme) -> Vec<Span<'static>> {
    let skip_bytes = line
        .char_indices()
        .nth(skip_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(line.len());

    let mut spans = Vec::new();
    let mut pos = skip_bytes;
    let mut push = |start: usize, end: usize, kind: TokenKind| {
        let start = start.max(skip_bytes);
        if start < end && end <= line.len() && line.is_char_boundary(start) && line.is_char_boundary(end) {
            spans.push(Span::styled(line[start..end].to_string(), style_for_kind(kind, theme)));
        }
    };
    for token in tokens {
        if token.end <= pos {
            continue;
        }
        if token.start > pos {
            push(pos, token.start, TokenKind::Normal);
        }
        push(token.start.max(pos), token.end, token.kind);
        pos = token.end;
    }
    if pos < line.len() {
        push(pos, line.len(), TokenKind::Normal);
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::styled_spans;
    use crate::theme::THEMES;
    use polypad::language::highlight::highlight::{Token, TokenKind};

    fn texts(line: &str, tokens: &[Token], skip: usize) -> Vec<String> {
        styled_spans(line, tokens, skip, &THEMES[0])
            .into_iter()
            .map(|s| s.content.into_owned())
            .collect()
    }

    #[test]
    fn gaps_between_tokens_are_filled() {
        let tokens = [
            Token { start: 0, end: 5, kind: TokenKind::Keyword },
            Token { start: 10, end: 11, kind: TokenKind::Number },
        ];
        assert_eq!(texts("const a = 5;", &tokens, 0), vec!["const", " a = ", "5", ";"]);
    }

    #[test]
    fn horizontal_scroll_cuts_into_tokens() {
        let tokens = [Token { start: 0, end: 5, kind: TokenKind::Keyword }];
        assert_eq!(texts("const x", &tokens, 2), vec!["nst", " x"]);
    }

    #[test]
    fn multibyte_text_is_not_split() {
        let tokens = [Token { start: 0, end: 4, kind: TokenKind::String }];
        assert_eq!(texts("\"é\" x", &tokens, 1), vec!["é\"", " x"]);
    }
}
