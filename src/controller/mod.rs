/// Controller subsystem - Handles all user input and command execution
///
/// Key events are parsed into commands, the dispatcher applies them to the
/// editor session, and the scheduler drives auto-save, assistant replies and
/// status expiry.

pub mod command_types;
pub mod dispatcher;
pub mod editor;
pub mod key_handler;
pub mod scheduler;
pub mod session;

// Re-export public interface
pub use command_types::{Command, Mode};
pub use dispatcher::{CommandDispatcher, ConfirmAnswer, EditorEvent, Outcome, Prompt, TextEdit};
pub use editor::EditorController;
pub use session::EditorSession;
