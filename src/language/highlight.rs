pub mod highlight {
    //! Syntax highlighting for the editor panel. A `Highlighter` parses the
    //! whole buffer with tree-sitter and reports byte ranges per line; if the
    //! grammar or query cannot be built it falls back to a keyword scanner.
    use crate::language::registry::registry::{Grammar, ModeDescriptor};
    use std::cmp::Reverse;
    use tracing::warn;
    use tree_sitter::{Language, Parser, Query, QueryCursor};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum TokenKind {
        Comment,
        Keyword,
        String,
        Number,
        Function,
        Type,
        Constant,
        Normal,
    }

    /// A highlighted byte range within a single line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Token {
        pub start: usize,
        pub end: usize,
        pub kind: TokenKind,
    }

    type Range = (usize, usize, TokenKind);

    fn grammar_language(grammar: Grammar) -> Language {
        match grammar {
            Grammar::JavaScript => tree_sitter_javascript::language(),
            Grammar::Java => tree_sitter_java::language(),
            Grammar::Python => tree_sitter_python::language(),
        }
    }

    fn query_source(grammar: Grammar) -> &'static str {
        match grammar {
            Grammar::JavaScript => r#"
                (comment) @comment
                (string) @string
                (template_string) @string
                (number) @number
                [
                    "function" "const" "let" "var" "return" "if" "else" "for" "while"
                    "class" "new" "import" "export" "from" "async" "await" "try" "catch"
                    "throw" "of" "in"
                ] @keyword
                (true) @constant
                (false) @constant
                (null) @constant
                (function_declaration name: (identifier) @function)
                (call_expression function: (identifier) @function)
                (call_expression function: (member_expression property: (property_identifier) @function))
                (class_declaration name: (identifier) @type)
            "#,
            Grammar::Python => r#"
                (comment) @comment
                (string) @string
                (integer) @number
                (float) @number
                [
                    "def" "class" "import" "from" "return" "if" "elif" "else" "for" "while"
                    "in" "with" "as" "lambda" "try" "except" "finally" "raise" "pass"
                    "and" "or" "not"
                ] @keyword
                (true) @constant
                (false) @constant
                (none) @constant
                (function_definition name: (identifier) @function)
                (call function: (identifier) @function)
                (class_definition name: (identifier) @type)
            "#,
            Grammar::Java => r#"
                (line_comment) @comment
                (block_comment) @comment
                (string_literal) @string
                (character_literal) @string
                (decimal_integer_literal) @number
                (decimal_floating_point_literal) @number
                [
                    "class" "public" "private" "protected" "static" "final" "return" "new"
                    "if" "else" "for" "while" "import" "package" "extends" "implements"
                ] @keyword
                (true) @constant
                (false) @constant
                (null_literal) @constant
                (void_type) @type
                (integral_type) @type
                (type_identifier) @type
                (method_declaration name: (identifier) @function)
                (method_invocation name: (identifier) @function)
                (class_declaration name: (identifier) @type)
            "#,
        }
    }

    fn map_capture_to_kind(capture_name: &str) -> TokenKind {
        match capture_name {
            "comment" => TokenKind::Comment,
            "keyword" => TokenKind::Keyword,
            "string" => TokenKind::String,
            "number" => TokenKind::Number,
            "function" => TokenKind::Function,
            "type" => TokenKind::Type,
            "constant" => TokenKind::Constant,
            _ => TokenKind::Normal,
        }
    }

    pub struct Highlighter {
        mode: ModeDescriptor,
        tree_sitter: Option<(Parser, Query)>,
    }

    impl Highlighter {
        pub fn new(mode: ModeDescriptor) -> Self {
            let mut parser = Parser::new();
            if let Err(e) = parser.set_language(grammar_language(mode.grammar)) {
                warn!(mode = mode.name, error = %e, "grammar unavailable, using keyword highlighting");
                return Self::fallback(mode);
            }
            match Query::new(grammar_language(mode.grammar), query_source(mode.grammar)) {
                Ok(query) => Self {
                    mode,
                    tree_sitter: Some((parser, query)),
                },
                Err(e) => {
                    warn!(mode = mode.name, error = ?e, "highlight query rejected, using keyword highlighting");
                    Self::fallback(mode)
                }
            }
        }

        /// Keyword scanner only; never touches tree-sitter.
        pub fn fallback(mode: ModeDescriptor) -> Self {
            Self {
                mode,
                tree_sitter: None,
            }
        }

        pub fn mode(&self) -> ModeDescriptor {
            self.mode
        }

        /// Highlight `text`, returning one token list per `\n`-separated line.
        pub fn highlight(&mut self, text: &str) -> Vec<Vec<Token>> {
            let ranges = self
                .tree_sitter_ranges(text)
                .unwrap_or_else(|| keyword_ranges(text, &self.mode));
            split_into_lines(text, ranges)
        }

        fn tree_sitter_ranges(&mut self, text: &str) -> Option<Vec<Range>> {
            let (parser, query) = self.tree_sitter.as_mut()?;
            let tree = parser.parse(text, None)?;
            let mut cursor = QueryCursor::new();
            let names = query.capture_names();
            let mut ranges = Vec::new();
            for m in cursor.matches(query, tree.root_node(), text.as_bytes()) {
                for capture in m.captures {
                    let kind = map_capture_to_kind(&names[capture.index as usize]);
                    ranges.push((capture.node.start_byte(), capture.node.end_byte(), kind));
                }
            }
            Some(ranges)
        }
    }

    /// Clip absolute ranges to lines. Overlaps are resolved in favour of the
    /// earliest, outermost range.
    pub(crate) fn split_into_lines(text: &str, mut ranges: Vec<Range>) -> Vec<Vec<Token>> {
        ranges.sort_by_key(|(start, end, _)| (*start, Reverse(*end)));
        let mut flat: Vec<Range> = Vec::with_capacity(ranges.len());
        let mut last_end = 0;
        for (start, end, kind) in ranges {
            let end = end.min(text.len());
            if start >= end || start < last_end {
                continue;
            }
            flat.push((start, end, kind));
            last_end = end;
        }

        let mut lines = Vec::new();
        let mut first = 0;
        let mut line_start = 0;
        for line in text.split('\n') {
            let line_end = line_start + line.len();
            while first < flat.len() && flat[first].1 <= line_start {
                first += 1;
            }
            let mut tokens = Vec::new();
            for &(start, end, kind) in flat[first..].iter() {
                if start >= line_end {
                    break;
                }
                let s = start.max(line_start) - line_start;
                let e = end.min(line_end) - line_start;
                if s < e {
                    tokens.push(Token { start: s, end: e, kind });
                }
            }
            lines.push(tokens);
            line_start = line_end + 1;
        }
        lines
    }

    fn keyword_ranges(text: &str, mode: &ModeDescriptor) -> Vec<Range> {
        let mut ranges = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            scan_line(line, offset, mode, &mut ranges);
            offset += line.len() + 1;
        }
        ranges
    }

    fn scan_line(line: &str, base: usize, mode: &ModeDescriptor, out: &mut Vec<Range>) {
        let mut chars = line.char_indices().peekable();
        while let Some((i, ch)) = chars.next() {
            if line[i..].starts_with(mode.line_comment) {
                out.push((base + i, base + line.len(), TokenKind::Comment));
                return;
            }
            if ch == '"' || ch == '\'' {
                let mut end = line.len();
                let mut escaped = false;
                for (j, c) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == ch {
                        end = j + c.len_utf8();
                        break;
                    }
                }
                out.push((base + i, base + end, TokenKind::String));
                continue;
            }
            if ch.is_alphanumeric() || ch == '_' {
                let mut end = i + ch.len_utf8();
                while let Some(&(j, c)) = chars.peek() {
                    if !(c.is_alphanumeric() || c == '_') {
                        break;
                    }
                    end = j + c.len_utf8();
                    chars.next();
                }
                let word = &line[i..end];
                if mode.keywords.contains(&word) {
                    out.push((base + i, base + end, TokenKind::Keyword));
                } else if ch.is_ascii_digit() {
                    out.push((base + i, base + end, TokenKind::Number));
                }
            }
        }
    }
}
