use unicode_width::UnicodeWidthChar;

const TAB: &str = "    ";

/// Line-based edit buffer behind the editor panel. `cursor_col` is a byte
/// offset into the current line and always sits on a char boundary.
pub struct EditorBuffer {
    pub lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize,
    pub horizontal_scroll: usize,
    pub line_numbers_width: usize,
}

impl EditorBuffer {
    pub fn new(text: &str) -> Self {
        let mut buffer = Self {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll_offset: 0,
            horizontal_scroll: 0,
            line_numbers_width: 4,
        };
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole buffer and put the cursor at the top.
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(|s| s.to_string()).collect();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
        self.horizontal_scroll = 0;
        self.update_line_numbers_width();
    }

    /// The buffer as one string. Inverse of `set_text`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn update_line_numbers_width(&mut self) {
        let max_line = self.lines.len();
        self.line_numbers_width = if max_line == 0 {
            4
        } else {
            (max_line as f64).log10().floor() as usize + 2
        }
        .max(4);
    }

    fn current_line(&self) -> &str {
        self.lines.get(self.cursor_row).map(|s| s.as_str()).unwrap_or("")
    }

    fn prev_boundary(line: &str, col: usize) -> usize {
        line[..col.min(line.len())]
            .char_indices()
            .next_back()
            .map(|(idx, _)| idx)
            .unwrap_or(0)
    }

    fn next_boundary(line: &str, col: usize) -> usize {
        line[col.min(line.len())..]
            .chars()
            .next()
            .map(|c| col + c.len_utf8())
            .unwrap_or(line.len())
    }

    fn char_pos(line: &str, col: usize) -> usize {
        line[..col.min(line.len())].chars().count()
    }

    fn byte_pos(line: &str, char_pos: usize) -> usize {
        line.char_indices()
            .nth(char_pos)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let col = self.cursor_col;
        let line = &mut self.lines[self.cursor_row];
        let col = col.min(line.len());
        line.insert(col, c);
        self.cursor_col = col + c.len_utf8();
    }

    pub fn insert_str(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.insert_newline();
            } else {
                self.insert_char(c);
            }
        }
    }

    pub fn insert_tab(&mut self) {
        self.insert_str(TAB);
    }

    pub fn delete_char(&mut self) {
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_row];
            let prev = Self::prev_boundary(line, self.cursor_col);
            line.replace_range(prev..self.cursor_col, "");
            self.cursor_col = prev;
        } else if self.cursor_row > 0 {
            // Join with previous line
            let current_line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            let prev_line_len = self.lines[self.cursor_row].len();
            self.lines[self.cursor_row].push_str(&current_line);
            self.cursor_col = prev_line_len;
            self.update_line_numbers_width();
        }
    }

    pub fn delete_char_forward(&mut self) {
        let line_len = self.lines[self.cursor_row].len();
        if self.cursor_col < line_len {
            let line = &mut self.lines[self.cursor_row];
            let next = Self::next_boundary(line, self.cursor_col);
            line.replace_range(self.cursor_col..next, "");
        } else if self.cursor_row + 1 < self.lines.len() {
            // Join with next line
            let next_line = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next_line);
            self.update_line_numbers_width();
        }
    }

    pub fn insert_newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let col = self.cursor_col.min(line.len());
        let remainder = line.split_off(col);
        self.lines.insert(self.cursor_row + 1, remainder);
        self.cursor_row += 1;
        self.cursor_col = 0;
        self.update_line_numbers_width();
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col = Self::prev_boundary(self.current_line(), self.cursor_col);
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_line().len();
        }
    }

    pub fn move_right(&mut self) {
        let line = self.current_line();
        if self.cursor_col < line.len() {
            self.cursor_col = Self::next_boundary(line, self.cursor_col);
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        self.move_vertical(-1);
    }

    pub fn move_down(&mut self) {
        self.move_vertical(1);
    }

    pub fn page_up(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_vertical(-1);
        }
    }

    pub fn page_down(&mut self, rows: usize) {
        for _ in 0..rows {
            self.move_vertical(1);
        }
    }

    // Keeps the character column, not the byte column.
    fn move_vertical(&mut self, delta: isize) {
        let target_row = self.cursor_row as isize + delta;
        if target_row < 0 || target_row as usize >= self.lines.len() {
            return;
        }
        let char_pos = Self::char_pos(self.current_line(), self.cursor_col);
        self.cursor_row = target_row as usize;
        self.cursor_col = Self::byte_pos(self.current_line(), char_pos);
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
        self.horizontal_scroll = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.current_line().len();
    }

    pub fn move_to_file_start(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_offset = 0;
        self.horizontal_scroll = 0;
    }

    pub fn move_to_file_end(&mut self) {
        self.cursor_row = self.lines.len().saturating_sub(1);
        self.cursor_col = self.current_line().len();
    }

    /// Character column of the cursor, for placing the terminal cursor.
    pub fn cursor_char_col(&self) -> usize {
        Self::char_pos(self.current_line(), self.cursor_col)
    }

    /// Display width of the current line up to the cursor, past the
    /// horizontal scroll.
    pub fn cursor_display_col(&self) -> usize {
        self.current_line()
            .chars()
            .take(self.cursor_char_col())
            .skip(self.horizontal_scroll)
            .map(|c| c.width().unwrap_or(1))
            .sum()
    }

    pub fn ensure_cursor_visible(&mut self, width: usize, height: usize) {
        // Vertical scrolling
        if self.cursor_row < self.scroll_offset {
            self.scroll_offset = self.cursor_row;
        } else if height > 0 && self.cursor_row >= self.scroll_offset + height {
            self.scroll_offset = self.cursor_row + 1 - height;
        }

        // Horizontal scrolling, in characters
        let available_width = width.saturating_sub(self.line_numbers_width + 2);
        let cursor_char_pos = self.cursor_char_col();
        if cursor_char_pos < self.horizontal_scroll {
            self.horizontal_scroll = cursor_char_pos.saturating_sub(5);
            return;
        }
        let mut display_width = 0;
        let mut char_count = self.horizontal_scroll;
        for ch in self.current_line().chars().skip(self.horizontal_scroll) {
            let ch_width = ch.width().unwrap_or(1);
            if display_width + ch_width > available_width {
                break;
            }
            display_width += ch_width;
            char_count += 1;
        }
        if cursor_char_pos >= char_count && available_width > 0 {
            self.horizontal_scroll = cursor_char_pos.saturating_sub(available_width.saturating_sub(10));
        }
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::new("")
    }
}
