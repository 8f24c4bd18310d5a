use crate::assistant::SuggestionAction;
use crate::controller::command_types::{Command, Mode};
use crate::controller::dispatcher::ConfirmAnswer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    pub fn parse_key(mode: &Mode, key_event: &KeyEvent) -> Option<Command> {
        let key = key_event.code;
        let modifiers = key_event.modifiers;

        // File shortcuts work from every input line except an open prompt
        if *mode != Mode::Confirm && *mode != Mode::PathInput {
            if let Some(command) = Self::parse_global_key(key, modifiers) {
                return Some(command);
            }
        }

        match mode {
            Mode::Editor => Self::parse_editor_key(key, modifiers),
            Mode::Assistant | Mode::PathInput => Self::parse_line_input_key(key, modifiers),
            Mode::Confirm => Self::parse_confirm_key(key),
        }
    }

    fn parse_global_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let alt = modifiers.contains(KeyModifiers::ALT);
        match key {
            KeyCode::Char(c) if ctrl && matches!(c.to_ascii_lowercase(), 'n' | 'o' | 's' | 'i' | 'q') => {
                Some(Command::Shortcut(c.to_ascii_lowercase()))
            }
            // Ctrl+I arrives as Tab on most terminals
            KeyCode::F(3) => Some(Command::TogglePanel),
            KeyCode::F(2) => Some(Command::FocusAssistant),
            KeyCode::Char('+') | KeyCode::Char('=') if ctrl || alt => Some(Command::FontSizeUp),
            KeyCode::Char('-') if ctrl || alt => Some(Command::FontSizeDown),
            KeyCode::F(5) => Some(Command::Suggestion(SuggestionAction::Correct)),
            KeyCode::F(6) => Some(Command::Suggestion(SuggestionAction::Summarize)),
            KeyCode::F(7) => Some(Command::Suggestion(SuggestionAction::Expand)),
            KeyCode::F(8) => Some(Command::Suggestion(SuggestionAction::Translate)),
            KeyCode::Char('l') if ctrl => Some(Command::Redraw),
            _ => None,
        }
    }

    fn parse_editor_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        let shift = modifiers.contains(KeyModifiers::SHIFT);

        match key {
            KeyCode::Char('a') if ctrl => Some(Command::SelectAll),
            KeyCode::Char('c') if ctrl => Some(Command::Copy),
            KeyCode::Char('x') if ctrl => Some(Command::Cut),
            KeyCode::Char('v') if ctrl => Some(Command::Paste),
            KeyCode::Char(_) if ctrl => None,
            KeyCode::Char(c) => Some(Command::InsertChar(c)),

            KeyCode::Left => Some(Command::MoveLeft(shift)),
            KeyCode::Right => Some(Command::MoveRight(shift)),
            KeyCode::Up => Some(Command::MoveUp(shift)),
            KeyCode::Down => Some(Command::MoveDown(shift)),
            KeyCode::Home if ctrl => Some(Command::MoveDocumentStart(shift)),
            KeyCode::End if ctrl => Some(Command::MoveDocumentEnd(shift)),
            KeyCode::Home => Some(Command::MoveLineStart(shift)),
            KeyCode::End => Some(Command::MoveLineEnd(shift)),

            KeyCode::Enter => Some(Command::InsertNewline),
            KeyCode::Tab => Some(Command::InsertTab),
            KeyCode::Backspace => Some(Command::DeleteBackward),
            KeyCode::Delete => Some(Command::DeleteForward),
            KeyCode::Esc => Some(Command::ClearSelection),
            _ => None,
        }
    }

    fn parse_line_input_key(key: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        match key {
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => None,
            KeyCode::Char(c) => Some(Command::LineChar(c)),
            KeyCode::Backspace => Some(Command::LineBackspace),
            KeyCode::Enter => Some(Command::LineSubmit),
            KeyCode::Esc => Some(Command::LineCancel),
            _ => None,
        }
    }

    fn parse_confirm_key(key: KeyCode) -> Option<Command> {
        match key {
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Char('y') | KeyCode::Char('Y') => {
                Some(Command::Confirm(ConfirmAnswer::Save))
            }
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Command::Confirm(ConfirmAnswer::Discard)),
            KeyCode::Esc => Some(Command::Confirm(ConfirmAnswer::Cancel)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_file_shortcuts() {
        for c in ['n', 'o', 's', 'i', 'q'] {
            assert_eq!(
                KeyHandler::parse_key(&Mode::Editor, &ctrl(c)),
                Some(Command::Shortcut(c))
            );
            assert_eq!(
                KeyHandler::parse_key(&Mode::Assistant, &ctrl(c)),
                Some(Command::Shortcut(c))
            );
        }
    }

    #[test]
    fn test_shortcuts_disabled_in_prompt() {
        assert_eq!(KeyHandler::parse_key(&Mode::PathInput, &ctrl('s')), None);
        assert_eq!(KeyHandler::parse_key(&Mode::Confirm, &ctrl('n')), None);
    }

    #[test]
    fn test_plain_letters_are_text() {
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &key(KeyCode::Char('s'))),
            Some(Command::InsertChar('s'))
        );
        assert_eq!(
            KeyHandler::parse_key(&Mode::Assistant, &key(KeyCode::Char('n'))),
            Some(Command::LineChar('n'))
        );
    }

    #[test]
    fn test_unbound_ctrl_letter_is_swallowed() {
        assert_eq!(KeyHandler::parse_key(&Mode::Editor, &ctrl('k')), None);
    }

    #[test]
    fn test_shift_arrow_extends_selection() {
        let event = KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT);
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &event),
            Some(Command::MoveRight(true))
        );
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &key(KeyCode::Right)),
            Some(Command::MoveRight(false))
        );
    }

    #[test]
    fn test_clipboard_keys() {
        assert_eq!(KeyHandler::parse_key(&Mode::Editor, &ctrl('c')), Some(Command::Copy));
        assert_eq!(KeyHandler::parse_key(&Mode::Editor, &ctrl('x')), Some(Command::Cut));
        assert_eq!(KeyHandler::parse_key(&Mode::Editor, &ctrl('v')), Some(Command::Paste));
        assert_eq!(KeyHandler::parse_key(&Mode::Editor, &ctrl('a')), Some(Command::SelectAll));
    }

    #[test]
    fn test_confirm_keys() {
        assert_eq!(
            KeyHandler::parse_key(&Mode::Confirm, &key(KeyCode::Char('s'))),
            Some(Command::Confirm(ConfirmAnswer::Save))
        );
        assert_eq!(
            KeyHandler::parse_key(&Mode::Confirm, &key(KeyCode::Char('n'))),
            Some(Command::Confirm(ConfirmAnswer::Discard))
        );
        assert_eq!(
            KeyHandler::parse_key(&Mode::Confirm, &key(KeyCode::Esc)),
            Some(Command::Confirm(ConfirmAnswer::Cancel))
        );
        assert_eq!(KeyHandler::parse_key(&Mode::Confirm, &key(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_suggestion_function_keys() {
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &key(KeyCode::F(6))),
            Some(Command::Suggestion(SuggestionAction::Summarize))
        );
    }

    #[test]
    fn test_font_size_keys() {
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &ctrl('+')),
            Some(Command::FontSizeUp)
        );
        let alt_minus = KeyEvent::new(KeyCode::Char('-'), KeyModifiers::ALT);
        assert_eq!(
            KeyHandler::parse_key(&Mode::Editor, &alt_minus),
            Some(Command::FontSizeDown)
        );
    }
}
