//! View Model - Abstracts session data for the view layer
//! This ensures the view has no direct dependencies on Document internals

use crate::assistant::AssistantMessage;
use crate::controller::EditorSession;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

/// The ViewModel trait provides everything the view needs to render
pub trait ViewModel {
    /// Zero-based cursor line and column (in characters)
    fn get_cursor_position(&self) -> CursorPosition;

    fn get_line_count(&self) -> usize;

    fn get_line(&self, line_number: usize) -> Option<String>;

    /// Selected column range on a line, half-open, in characters
    fn get_selection_on_line(&self, line_number: usize) -> Option<(usize, usize)>;

    fn title(&self) -> String;

    /// Status bar segments, left to right
    fn status_segments(&self) -> Vec<String>;

    fn panel_visible(&self) -> bool;

    fn messages(&self) -> &[AssistantMessage];
}

/// Concrete implementation that adapts an EditorSession to ViewModel
pub struct SessionViewModel<'a> {
    session: &'a EditorSession,
}

impl<'a> SessionViewModel<'a> {
    pub fn new(session: &'a EditorSession) -> Self {
        Self { session }
    }
}

impl<'a> ViewModel for SessionViewModel<'a> {
    fn get_cursor_position(&self) -> CursorPosition {
        let (line, column) = self.session.document.buffer().cursor_position();
        CursorPosition { line, column }
    }

    fn get_line_count(&self) -> usize {
        self.session.document.buffer().line_count()
    }

    fn get_line(&self, line_number: usize) -> Option<String> {
        self.session
            .document
            .buffer()
            .line(line_number)
            .map(str::to_string)
    }

    fn get_selection_on_line(&self, line_number: usize) -> Option<(usize, usize)> {
        let buffer = self.session.document.buffer();
        let selection = buffer.selection()?;

        let mut line_start = 0;
        for (i, line) in buffer.text().split('\n').enumerate() {
            let line_len = line.chars().count();
            if i == line_number {
                let line_end = line_start + line_len;
                let start = selection.start.max(line_start);
                let end = selection.end.min(line_end);
                if start >= end {
                    return None;
                }
                return Some((start - line_start, end - line_start));
            }
            line_start += line_len + 1;
        }
        None
    }

    fn title(&self) -> String {
        self.session.title()
    }

    fn status_segments(&self) -> Vec<String> {
        vec![
            self.session.status_message.clone(),
            self.session.word_count_label(),
            self.session.cursor_label(),
            self.session.font_size_label(),
            self.session.document.buffer().line_ending().name().to_string(),
        ]
    }

    fn panel_visible(&self) -> bool {
        self.session.panel_visible
    }

    fn messages(&self) -> &[AssistantMessage] {
        self.session.conversation.messages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_split_across_lines() {
        let mut session = EditorSession::default();
        session.document.edit("abc\ndef\nghi".to_string());
        session.document.navigate(|b| b.select(2, 9));

        let vm = SessionViewModel::new(&session);
        assert_eq!(vm.get_selection_on_line(0), Some((2, 3)));
        assert_eq!(vm.get_selection_on_line(1), Some((0, 3)));
        assert_eq!(vm.get_selection_on_line(2), Some((0, 1)));
    }

    #[test]
    fn test_status_segments() {
        let mut session = EditorSession::default();
        session.document.edit("una palabra".to_string());
        let vm = SessionViewModel::new(&session);
        let segments = vm.status_segments();
        assert_eq!(segments[1], "2 palabras");
        assert_eq!(segments[2], "Línea 1, Columna 1");
        assert_eq!(segments[3], "14px");
    }
}
