//! Plain text storage with a char-offset cursor and an optional selection.
//!
//! Text is held with `\n` line breaks; the original line ending is remembered
//! so saving writes the file back the way it was read. A file with mixed
//! endings is kept byte for byte.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    Unix,    // \n (LF)
    Windows, // \r\n (CRLF)
    Mac,     // \r (CR)
    Mixed,   // more than one kind; text kept verbatim
}

impl LineEnding {
    pub fn system_default() -> Self {
        if cfg!(windows) {
            LineEnding::Windows
        } else {
            LineEnding::Unix
        }
    }

    /// Classify every line break. Only a file that uses one kind throughout
    /// gets that kind; anything else is `Mixed`.
    pub fn detect(content: &str) -> Self {
        let mut found: Option<LineEnding> = None;
        let mut chars = content.chars().peekable();

        while let Some(ch) = chars.next() {
            let kind = match ch {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    LineEnding::Windows
                }
                '\r' => LineEnding::Mac,
                '\n' => LineEnding::Unix,
                _ => continue,
            };
            match found {
                None => found = Some(kind),
                Some(seen) if seen != kind => return LineEnding::Mixed,
                Some(_) => {}
            }
        }

        found.unwrap_or_else(LineEnding::system_default)
    }

    pub fn name(&self) -> &'static str {
        match self {
            LineEnding::Unix => "unix",
            LineEnding::Windows => "dos",
            LineEnding::Mac => "mac",
            LineEnding::Mixed => "mixed",
        }
    }

    /// Bring incoming text to the in-memory form. `Mixed` leaves it alone.
    fn normalize(&self, text: &str) -> String {
        match self {
            LineEnding::Mixed => text.to_string(),
            _ => text.replace("\r\n", "\n").replace('\r', "\n"),
        }
    }
}

/// A selection as a half-open char range, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
    anchor: Option<usize>,
    line_ending: LineEnding,
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            anchor: None,
            line_ending: LineEnding::system_default(),
        }
    }

    pub fn from_string(content: String) -> Self {
        let line_ending = LineEnding::detect(&content);
        let text = line_ending.normalize(&content);

        Self {
            text,
            cursor: 0,
            anchor: None,
            line_ending,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Content with the remembered line ending applied, as written to disk.
    pub fn to_file_content(&self) -> String {
        match self.line_ending {
            LineEnding::Unix | LineEnding::Mixed => self.text.clone(),
            LineEnding::Windows => self.text.replace('\n', "\r\n"),
            LineEnding::Mac => self.text.replace('\n', "\r"),
        }
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the whole text, keeping the cursor where it still fits.
    pub fn set_text(&mut self, text: String) {
        self.text = self.line_ending.normalize(&text);
        self.cursor = self.cursor.min(self.len_chars());
        self.anchor = None;
    }

    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len_chars());
        self.anchor = None;
    }

    pub fn selection(&self) -> Option<Selection> {
        self.anchor
            .map(|anchor| Selection::new(anchor, self.cursor))
            .filter(|sel| !sel.is_empty())
    }

    pub fn select(&mut self, start: usize, end: usize) {
        let len = self.len_chars();
        self.anchor = Some(start.min(len));
        self.cursor = end.min(len);
    }

    pub fn select_all(&mut self) {
        self.select(0, self.len_chars());
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    pub fn selected_text(&self) -> Option<String> {
        self.selection().map(|sel| self.slice(sel.start, sel.end))
    }

    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect()
    }

    fn byte_index(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn delete_range(&mut self, start: usize, end: usize) {
        let start_byte = self.byte_index(start);
        let end_byte = self.byte_index(end);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = start;
        self.anchor = None;
    }

    /// Remove the selected text, returning true if there was a selection.
    pub fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some(sel) => {
                self.delete_range(sel.start, sel.end);
                true
            }
            None => {
                self.anchor = None;
                false
            }
        }
    }

    pub fn insert_str(&mut self, s: &str) {
        self.delete_selection();
        let normalized = self.line_ending.normalize(s);
        let byte = self.byte_index(self.cursor);
        self.text.insert_str(byte, &normalized);
        self.cursor += normalized.chars().count();
    }

    pub fn insert_char(&mut self, ch: char) {
        self.delete_selection();
        let byte = self.byte_index(self.cursor);
        self.text.insert(byte, ch);
        self.cursor += 1;
    }

    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor == 0 {
            return false;
        }
        self.delete_range(self.cursor - 1, self.cursor);
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.delete_selection() {
            return true;
        }
        if self.cursor >= self.len_chars() {
            return false;
        }
        self.delete_range(self.cursor, self.cursor + 1);
        true
    }

    // Line geometry, zero-based

    fn line_starts(&self) -> Vec<usize> {
        let mut starts = vec![0];
        for (i, ch) in self.text.chars().enumerate() {
            if ch == '\n' {
                starts.push(i + 1);
            }
        }
        starts
    }

    pub fn line_count(&self) -> usize {
        self.line_starts().len()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.text.split('\n').nth(line)
    }

    /// Zero-based (line, column) of the cursor.
    pub fn cursor_position(&self) -> (usize, usize) {
        let starts = self.line_starts();
        let line = starts
            .iter()
            .rposition(|&start| start <= self.cursor)
            .unwrap_or(0);
        (line, self.cursor - starts[line])
    }

    fn line_len(&self, line: usize) -> usize {
        self.line(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    fn move_to(&mut self, offset: usize, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor);
            }
        } else {
            self.anchor = None;
        }
        self.cursor = offset.min(self.len_chars());
    }

    pub fn move_left(&mut self, extend: bool) {
        self.move_to(self.cursor.saturating_sub(1), extend);
    }

    pub fn move_right(&mut self, extend: bool) {
        self.move_to(self.cursor + 1, extend);
    }

    pub fn move_up(&mut self, extend: bool) {
        let (line, column) = self.cursor_position();
        if line == 0 {
            self.move_to(0, extend);
            return;
        }
        let starts = self.line_starts();
        let target = starts[line - 1] + column.min(self.line_len(line - 1));
        self.move_to(target, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let (line, column) = self.cursor_position();
        let starts = self.line_starts();
        if line + 1 >= starts.len() {
            self.move_to(self.len_chars(), extend);
            return;
        }
        let target = starts[line + 1] + column.min(self.line_len(line + 1));
        self.move_to(target, extend);
    }

    pub fn move_line_start(&mut self, extend: bool) {
        let (line, _) = self.cursor_position();
        let start = self.line_starts()[line];
        self.move_to(start, extend);
    }

    pub fn move_line_end(&mut self, extend: bool) {
        let (line, _) = self.cursor_position();
        let end = self.line_starts()[line] + self.line_len(line);
        self.move_to(end, extend);
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.move_to(0, extend);
    }

    pub fn move_document_end(&mut self, extend: bool) {
        self.move_to(self.len_chars(), extend);
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_delete() {
        let mut buffer = TextBuffer::new();
        for ch in "hola".chars() {
            buffer.insert_char(ch);
        }
        assert_eq!(buffer.text(), "hola");
        assert_eq!(buffer.cursor(), 4);

        assert!(buffer.delete_backward());
        assert_eq!(buffer.text(), "hol");

        buffer.set_cursor(0);
        assert!(!buffer.delete_backward());
        assert!(buffer.delete_forward());
        assert_eq!(buffer.text(), "ol");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut buffer = TextBuffer::from_string("año".to_string());
        buffer.set_cursor(2);
        buffer.insert_char('ñ');
        assert_eq!(buffer.text(), "añño");
        assert!(buffer.delete_backward());
        assert!(buffer.delete_backward());
        assert_eq!(buffer.text(), "ao");
    }

    #[test]
    fn test_line_ending_round_trip() {
        let buffer = TextBuffer::from_string("a\r\nb\r\n".to_string());
        assert_eq!(buffer.text(), "a\nb\n");
        assert_eq!(buffer.line_ending(), LineEnding::Windows);
        assert_eq!(buffer.to_file_content(), "a\r\nb\r\n");

        let mac = TextBuffer::from_string("a\rb".to_string());
        assert_eq!(mac.line_ending(), LineEnding::Mac);
        assert_eq!(mac.text(), "a\nb");
    }

    #[test]
    fn test_stray_carriage_return_kept_verbatim() {
        let mut buffer = TextBuffer::from_string("uno\ndos\rx\ntres\n".to_string());
        assert_eq!(buffer.line_ending(), LineEnding::Mixed);
        buffer.insert_char('Z');
        assert_eq!(buffer.to_file_content(), "Zuno\ndos\rx\ntres\n");
    }

    #[test]
    fn test_mixed_crlf_and_lf_kept_verbatim() {
        let content = "a\r\nb\nc\r\n";
        let buffer = TextBuffer::from_string(content.to_string());
        assert_eq!(buffer.line_ending(), LineEnding::Mixed);
        assert_eq!(buffer.to_file_content(), content);
    }

    #[test]
    fn test_detect_uniform_endings() {
        assert_eq!(LineEnding::detect("a\nb\n"), LineEnding::Unix);
        assert_eq!(LineEnding::detect("a\r\nb\r\n"), LineEnding::Windows);
        assert_eq!(LineEnding::detect("a\rb\r"), LineEnding::Mac);
        assert_eq!(LineEnding::detect("sin saltos"), LineEnding::system_default());
    }

    #[test]
    fn test_vertical_movement_clamps_column() {
        let mut buffer = TextBuffer::from_string("long line\nab\nanother".to_string());
        buffer.set_cursor(8);
        buffer.move_down(false);
        assert_eq!(buffer.cursor_position(), (1, 2));
        buffer.move_down(false);
        assert_eq!(buffer.cursor_position(), (2, 2));
        buffer.move_down(false);
        assert_eq!(buffer.cursor(), buffer.len_chars());
        buffer.move_up(false);
        buffer.move_up(false);
        assert_eq!(buffer.cursor_position(), (0, 2));
        buffer.move_up(false);
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_line_start_and_end() {
        let mut buffer = TextBuffer::from_string("abc\ndef".to_string());
        buffer.set_cursor(5);
        buffer.move_line_start(false);
        assert_eq!(buffer.cursor(), 4);
        buffer.move_line_end(false);
        assert_eq!(buffer.cursor(), 7);
    }

    #[test]
    fn test_selection_extend_and_replace() {
        let mut buffer = TextBuffer::from_string("hello world".to_string());
        buffer.set_cursor(6);
        for _ in 0..5 {
            buffer.move_right(true);
        }
        assert_eq!(buffer.selection(), Some(Selection::new(6, 11)));
        assert_eq!(buffer.selected_text().as_deref(), Some("world"));

        buffer.insert_str("mundo");
        assert_eq!(buffer.text(), "hello mundo");
        assert_eq!(buffer.selection(), None);
    }

    #[test]
    fn test_select_all_and_delete() {
        let mut buffer = TextBuffer::from_string("abc".to_string());
        buffer.select_all();
        assert!(buffer.delete_backward());
        assert_eq!(buffer.text(), "");
        assert_eq!(buffer.cursor(), 0);
    }

    #[test]
    fn test_set_text_clamps_cursor() {
        let mut buffer = TextBuffer::from_string("abcdef".to_string());
        buffer.set_cursor(6);
        buffer.set_text("ab".to_string());
        assert_eq!(buffer.cursor(), 2);
    }
}
