//! Line-oriented text buffer with a single cursor
//!
//! All column arithmetic is done in `char`s (Unicode scalar values), never in
//! bytes, so a multi-byte character is always inserted or removed as a unit.

use std::path::PathBuf;

/// Default indentation unit width (in spaces)
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Bracket and quote pairs inserted together in insert mode
const AUTO_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('"', '"'),
    ('\'', '\''),
    ('`', '`'),
];

/// Openers that trigger an extra indent level on newline
const INDENT_OPENERS: &[char] = &['{', '[', '(', ':'];

/// Position in a buffer, (line, column) in chars
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// An ordered sequence of lines plus a cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    /// Lines without their terminating newline; never empty
    pub lines: Vec<String>,
    pub cursor_line: usize,
    /// Cursor column in chars, always within `0..=line_len(cursor_line)`
    pub cursor_column: usize,
    /// Backing file, `None` for untitled and scratch buffers
    pub path: Option<PathBuf>,
    /// Bumped on every content mutation
    pub revision: u64,
    /// Unsaved edits present
    pub modified: bool,
    pub indent_width: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// Empty untitled buffer
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_column: 0,
            path: None,
            revision: 0,
            modified: false,
            indent_width: DEFAULT_INDENT_WIDTH,
        }
    }

    /// Buffer holding `text`, split on `\n`
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.lines = text.split('\n').map(str::to_string).collect();
        buffer
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Replace the whole content, keeping the cursor clamped
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.clamp_cursor();
        self.touch();
    }

    /// Full text with `\n` separators
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(String::as_str)
    }

    /// Length of a line in chars (0 for out-of-range lines)
    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| l.chars().count())
    }

    /// Total chars, counting each line break as one
    pub fn char_count(&self) -> usize {
        let text: usize = self.lines.iter().map(|l| l.chars().count()).sum();
        text + self.lines.len().saturating_sub(1)
    }

    pub fn cursor(&self) -> Position {
        Position::new(self.cursor_line, self.cursor_column)
    }

    pub fn current_line(&self) -> &str {
        self.lines
            .get(self.cursor_line)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Character at the cursor (the one a typed closer would skip over)
    pub fn char_at_cursor(&self) -> Option<char> {
        self.current_line().chars().nth(self.cursor_column)
    }

    /// Character immediately before the cursor on the same line
    pub fn char_before_cursor(&self) -> Option<char> {
        if self.cursor_column == 0 {
            return None;
        }
        self.current_line().chars().nth(self.cursor_column - 1)
    }

    /// Pull the cursor back inside the buffer
    pub fn clamp_cursor(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.cursor_line = self.cursor_line.min(self.lines.len() - 1);
        self.cursor_column = self.cursor_column.min(self.line_len(self.cursor_line));
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
        self.modified = true;
    }

    fn indent_unit(&self) -> String {
        " ".repeat(self.indent_width)
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Insert one character at the cursor. `\n` splits the line.
    pub fn insert(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline(false);
            return;
        }
        self.clamp_cursor();
        let at = byte_index(&self.lines[self.cursor_line], self.cursor_column);
        self.lines[self.cursor_line].insert(at, ch);
        self.cursor_column += 1;
        self.touch();
    }

    /// Insert a string with no line breaks at the cursor
    pub fn insert_str(&mut self, s: &str) {
        if s.contains('\n') {
            self.paste(s);
            return;
        }
        self.clamp_cursor();
        let at = byte_index(&self.lines[self.cursor_line], self.cursor_column);
        self.lines[self.cursor_line].insert_str(at, s);
        self.cursor_column += s.chars().count();
        self.touch();
    }

    /// Delete the character before the cursor; at column 0 join with the
    /// previous line. Returns false when nothing was deleted.
    pub fn delete_backward(&mut self) -> bool {
        self.clamp_cursor();
        if self.cursor_column > 0 {
            let line = &mut self.lines[self.cursor_line];
            let start = byte_index(line, self.cursor_column - 1);
            let end = byte_index(line, self.cursor_column);
            line.replace_range(start..end, "");
            self.cursor_column -= 1;
            self.touch();
            true
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_column = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
            self.touch();
            true
        } else {
            false
        }
    }

    /// Split the line at the cursor.
    ///
    /// With `auto_indent` the new line inherits the current line's leading
    /// whitespace, plus one indent unit after an opener (`{ [ ( :`). When the
    /// cursor sits between a matching pair the block is split over three lines
    /// with the cursor on the indented middle line.
    pub fn insert_newline(&mut self, auto_indent: bool) {
        self.clamp_cursor();
        let line = self.lines[self.cursor_line].clone();
        let at = byte_index(&line, self.cursor_column);
        let (left, right) = line.split_at(at);

        if !auto_indent {
            self.lines[self.cursor_line] = left.to_string();
            self.lines.insert(self.cursor_line + 1, right.to_string());
            self.cursor_line += 1;
            self.cursor_column = 0;
            self.touch();
            return;
        }

        let indent: String = line
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        let prev = left.chars().next_back();
        let next = right.chars().next();
        let extra = match prev {
            Some(c) if INDENT_OPENERS.contains(&c) => self.indent_unit(),
            _ => String::new(),
        };
        let split_block = matches!(
            (prev, next),
            (Some('{'), Some('}')) | (Some('['), Some(']')) | (Some('('), Some(')'))
        );

        let middle = format!("{indent}{extra}");
        let column = middle.chars().count();
        self.lines[self.cursor_line] = left.to_string();
        if split_block {
            let closing = format!("{indent}{right}");
            self.lines.insert(self.cursor_line + 1, middle);
            self.lines.insert(self.cursor_line + 2, closing);
        } else {
            let rest = right.trim_start_matches([' ', '\t']);
            self.lines
                .insert(self.cursor_line + 1, format!("{middle}{rest}"));
        }
        self.cursor_line += 1;
        self.cursor_column = column;
        self.touch();
    }

    /// Insert possibly multi-line text at the cursor; the cursor ends up
    /// after the last pasted character. Line endings are normalized.
    pub fn paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = normalize_line_endings(text);
        self.clamp_cursor();

        let current = self.lines[self.cursor_line].clone();
        let at = byte_index(&current, self.cursor_column);
        let (left, right) = current.split_at(at);

        let pieces: Vec<&str> = text.split('\n').collect();
        if let [single] = pieces.as_slice() {
            self.lines[self.cursor_line] = format!("{left}{single}{right}");
            self.cursor_column += single.chars().count();
        } else {
            let last = pieces[pieces.len() - 1];
            let mut replacement = Vec::with_capacity(pieces.len());
            replacement.push(format!("{left}{}", pieces[0]));
            replacement.extend(pieces[1..pieces.len() - 1].iter().map(|s| s.to_string()));
            replacement.push(format!("{last}{right}"));

            let inserted = replacement.len();
            self.lines
                .splice(self.cursor_line..=self.cursor_line, replacement);
            self.cursor_line += inserted - 1;
            self.cursor_column = last.chars().count();
        }
        self.touch();
    }

    /// Remove the text between two positions (start inclusive, end exclusive),
    /// returning it. The cursor moves to `start`.
    pub fn delete_span(&mut self, start: Position, end: Position) -> String {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let start = self.clamp_position(start);
        let end = self.clamp_position(end);
        if start == end {
            return String::new();
        }

        let removed = self.text_in_span(start, end);
        let head_at = byte_index(&self.lines[start.line], start.column);
        let tail_at = byte_index(&self.lines[end.line], end.column);
        let joined = format!(
            "{}{}",
            &self.lines[start.line][..head_at],
            &self.lines[end.line][tail_at..]
        );
        self.lines
            .splice(start.line..=end.line, std::iter::once(joined));
        self.cursor_line = start.line;
        self.cursor_column = start.column;
        self.touch();
        removed
    }

    fn text_in_span(&self, start: Position, end: Position) -> String {
        if start.line == end.line {
            return self.lines[start.line]
                .chars()
                .skip(start.column)
                .take(end.column - start.column)
                .collect();
        }
        let mut out: String = self.lines[start.line].chars().skip(start.column).collect();
        for line in &self.lines[start.line + 1..end.line] {
            out.push('\n');
            out.push_str(line);
        }
        out.push('\n');
        out.extend(self.lines[end.line].chars().take(end.column));
        out
    }

    fn clamp_position(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len().saturating_sub(1));
        Position::new(line, pos.column.min(self.line_len(line)))
    }

    // ========================================================================
    // Paired characters
    // ========================================================================

    /// Insert a typed character with bracket/quote pairing.
    ///
    /// A closer matching the character under the cursor is stepped over; an
    /// opener inserts its closer after the cursor.
    pub fn type_char(&mut self, ch: char) {
        if is_closer(ch) && self.char_at_cursor() == Some(ch) {
            self.cursor_column += 1;
            return;
        }
        match closer_for(ch) {
            Some(close) => {
                self.insert(ch);
                let at = byte_index(&self.lines[self.cursor_line], self.cursor_column);
                self.lines[self.cursor_line].insert(at, close);
            }
            None => self.insert(ch),
        }
    }

    /// Backspace that removes an empty pair (`(|)`) as one operation
    pub fn backspace(&mut self) -> bool {
        if let (Some(open), Some(close)) = (self.char_before_cursor(), self.char_at_cursor()) {
            if closer_for(open) == Some(close) {
                let line = &mut self.lines[self.cursor_line];
                let start = byte_index(line, self.cursor_column - 1);
                let end = byte_index(line, self.cursor_column + 1);
                line.replace_range(start..end, "");
                self.cursor_column -= 1;
                self.touch();
                return true;
            }
        }
        self.delete_backward()
    }

    // ========================================================================
    // Cursor movement
    // ========================================================================

    pub fn move_left(&mut self) {
        self.cursor_column = self.cursor_column.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_column = (self.cursor_column + 1).min(self.line_len(self.cursor_line));
    }

    pub fn move_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.clamp_cursor();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.clamp_cursor();
        }
    }

    /// Left that wraps to the end of the previous line
    pub fn move_left_wrapping(&mut self) {
        if self.cursor_column > 0 {
            self.cursor_column -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_column = self.line_len(self.cursor_line);
        }
    }

    /// Right that wraps to the start of the next line
    pub fn move_right_wrapping(&mut self) {
        if self.cursor_column < self.line_len(self.cursor_line) {
            self.cursor_column += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_column = 0;
        }
    }

    pub fn move_line_start(&mut self) {
        self.cursor_column = 0;
    }

    pub fn move_line_end(&mut self) {
        self.cursor_column = self.line_len(self.cursor_line);
    }

    /// Identifier-ish text immediately before the cursor (letters, digits,
    /// `_` and `.`), used as the completion prefix
    pub fn word_prefix(&self) -> String {
        let before: Vec<char> = self.current_line().chars().take(self.cursor_column).collect();
        let start = before
            .iter()
            .rposition(|c| !(c.is_alphanumeric() || *c == '_' || *c == '.'))
            .map_or(0, |i| i + 1);
        before[start..].iter().collect()
    }
}

/// Byte offset of the `column`-th char, clamped to the line end
pub fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(idx, _)| idx)
}

/// Convert `\r\n` and lone `\r` to `\n`
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn closer_for(open: char) -> Option<char> {
    AUTO_PAIRS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, c)| *c)
}

fn is_closer(ch: char) -> bool {
    AUTO_PAIRS.iter().any(|(_, c)| *c == ch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_at(text: &str, line: usize, column: usize) -> Buffer {
        let mut buffer = Buffer::from_text(text);
        buffer.cursor_line = line;
        buffer.cursor_column = column;
        buffer
    }

    #[test]
    fn test_insert_multibyte_is_atomic() {
        let mut buffer = buffer_at("héllo", 0, 2);
        buffer.insert('ß');
        assert_eq!(buffer.lines[0], "héßllo");
        assert_eq!(buffer.cursor_column, 3);
        assert!(buffer.delete_backward());
        assert_eq!(buffer.lines[0], "héllo");
        assert_eq!(buffer.cursor_column, 2);
    }

    #[test]
    fn test_delete_backward_at_column_zero_merges() {
        let mut buffer = buffer_at("foo\nbär", 1, 0);
        assert!(buffer.delete_backward());
        assert_eq!(buffer.lines, vec!["foobär"]);
        assert_eq!(buffer.cursor(), Position::new(0, 3));
    }

    #[test]
    fn test_delete_backward_at_start_of_buffer_is_noop() {
        let mut buffer = buffer_at("abc", 0, 0);
        let revision = buffer.revision;
        assert!(!buffer.delete_backward());
        assert_eq!(buffer.lines, vec!["abc"]);
        assert_eq!(buffer.revision, revision);
    }

    #[test]
    fn test_newline_auto_indent_after_brace() {
        let mut buffer = buffer_at("    if x {", 0, 10);
        buffer.insert_newline(true);
        assert_eq!(buffer.lines, vec!["    if x {", "        "]);
        assert_eq!(buffer.cursor(), Position::new(1, 8));
    }

    #[test]
    fn test_newline_split_block() {
        let mut buffer = buffer_at("  foo()", 0, 6);
        buffer.insert_newline(true);
        assert_eq!(buffer.lines, vec!["  foo(", "      ", "  )"]);
        assert_eq!(buffer.cursor(), Position::new(1, 6));
    }

    #[test]
    fn test_newline_plain_keeps_indent_and_trims_rest() {
        let mut buffer = buffer_at("\tlet a = 1;   b", 0, 11);
        buffer.insert_newline(true);
        assert_eq!(buffer.lines, vec!["\tlet a = 1;", "\tb"]);
        assert_eq!(buffer.cursor(), Position::new(1, 1));
    }

    #[test]
    fn test_newline_without_indent() {
        let mut buffer = buffer_at("    abc", 0, 5);
        buffer.insert_newline(false);
        assert_eq!(buffer.lines, vec!["    a", "bc"]);
        assert_eq!(buffer.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_paste_multiline() {
        let mut buffer = buffer_at("start end", 0, 6);
        buffer.paste("one\r\ntwo\rthree ");
        assert_eq!(buffer.lines, vec!["start one", "two", "three end"]);
        assert_eq!(buffer.cursor(), Position::new(2, 6));
    }

    #[test]
    fn test_paste_then_delete_span_round_trips() {
        let original = "fn main() {\n    println!(\"日本\");\n}";
        let mut buffer = buffer_at(original, 1, 14);
        let start = buffer.cursor();
        buffer.paste("a\nbé\n\nc");
        let end = buffer.cursor();
        let removed = buffer.delete_span(start, end);
        assert_eq!(removed, "a\nbé\n\nc");
        assert_eq!(buffer.text(), original);
    }

    #[test]
    fn test_auto_pair_and_skip_over() {
        let mut buffer = Buffer::new();
        buffer.type_char('(');
        assert_eq!(buffer.lines[0], "()");
        assert_eq!(buffer.cursor_column, 1);
        buffer.type_char(')');
        assert_eq!(buffer.lines[0], "()");
        assert_eq!(buffer.cursor_column, 2);
    }

    #[test]
    fn test_quote_pairs_then_skips() {
        let mut buffer = Buffer::new();
        buffer.type_char('"');
        buffer.type_char('x');
        buffer.type_char('"');
        assert_eq!(buffer.lines[0], "\"x\"");
        assert_eq!(buffer.cursor_column, 3);
    }

    #[test]
    fn test_backspace_removes_empty_pair() {
        let mut buffer = Buffer::new();
        buffer.type_char('[');
        assert!(buffer.backspace());
        assert_eq!(buffer.lines[0], "");
        assert_eq!(buffer.cursor_column, 0);
    }

    #[test]
    fn test_char_count_tracks_inserts_and_deletes() {
        let mut buffer = Buffer::new();
        for ch in "añb\nç".chars() {
            buffer.insert(ch);
        }
        assert_eq!(buffer.char_count(), 5);
        buffer.delete_backward();
        buffer.delete_backward();
        assert_eq!(buffer.char_count(), 3);
        assert_eq!(buffer.text(), "añb");
    }

    #[test]
    fn test_vertical_move_clamps_column() {
        let mut buffer = buffer_at("long line\nab", 0, 8);
        buffer.move_down();
        assert_eq!(buffer.cursor(), Position::new(1, 2));
    }

    #[test]
    fn test_wrapping_moves() {
        let mut buffer = buffer_at("ab\ncd", 1, 0);
        buffer.move_left_wrapping();
        assert_eq!(buffer.cursor(), Position::new(0, 2));
        buffer.move_right_wrapping();
        assert_eq!(buffer.cursor(), Position::new(1, 0));
    }

    #[test]
    fn test_word_prefix() {
        let buffer = buffer_at("x := fmt.Pri", 0, 12);
        assert_eq!(buffer.word_prefix(), "fmt.Pri");
        let buffer = buffer_at("a + bc", 0, 6);
        assert_eq!(buffer.word_prefix(), "bc");
    }
}
