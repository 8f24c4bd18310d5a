use crate::assistant::SuggestionAction;
use crate::controller::dispatcher::{ConfirmAnswer, PromptKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    // Cursor movement; the flag extends the selection (Shift held)
    MoveLeft(bool),
    MoveRight(bool),
    MoveUp(bool),
    MoveDown(bool),
    MoveLineStart(bool),
    MoveLineEnd(bool),
    MoveDocumentStart(bool),
    MoveDocumentEnd(bool),
    ClearSelection,
    SelectAll,

    // Text input
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // Clipboard
    Copy,
    Cut,
    Paste,

    // Ctrl+letter file and panel shortcuts, resolved by the dispatcher
    Shortcut(char),
    TogglePanel,
    FocusAssistant,
    FontSizeUp,
    FontSizeDown,
    Suggestion(SuggestionAction),

    // Single-line input: assistant prompt and path prompt
    LineChar(char),
    LineBackspace,
    LineSubmit,
    LineCancel,

    Confirm(ConfirmAnswer),
    Redraw,
}

/// Where keystrokes go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Editor,
    Assistant,
    Confirm,
    PathInput,
}

impl From<PromptKind> for Mode {
    fn from(kind: PromptKind) -> Self {
        match kind {
            PromptKind::Confirm => Mode::Confirm,
            PromptKind::Path => Mode::PathInput,
        }
    }
}
