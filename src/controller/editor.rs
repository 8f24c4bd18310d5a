use crate::config::RcConfig;
use crate::controller::command_types::{Command, Mode};
use crate::controller::dispatcher::{CommandDispatcher, EditorEvent, Outcome, Prompt, TextEdit};
use crate::controller::key_handler::KeyHandler;
use crate::controller::session::EditorSession;
use crate::host::HostBridge;
use crate::view::{RenderParams, SessionViewModel, View};
use arboard::Clipboard;
use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

const FONT_STEP: u16 = 2;
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Terminal front end: turns key events into dispatcher calls and draws the
/// session after each one.
pub struct EditorController<H: HostBridge> {
    dispatcher: CommandDispatcher<H>,
    view: View,
    mode: Mode,
    line_input: String,
    prompt: Option<Prompt>,
    clipboard: Option<Clipboard>,
}

impl<H: HostBridge> EditorController<H> {
    pub fn new(host: H, config: &RcConfig) -> Self {
        let session = EditorSession::new(config.font_size, config.assistant_panel);
        let mut view = View::new();
        view.set_line_numbers(config.show_line_numbers);
        view.set_tab_stop(config.tab_stop);

        let clipboard = match Clipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable");
                None
            }
        };

        Self {
            dispatcher: CommandDispatcher::new(host, session, config.timings()),
            view,
            mode: Mode::Editor,
            line_input: String::new(),
            prompt: None,
            clipboard,
        }
    }

    pub fn start(&mut self, file: Option<PathBuf>) {
        let now = Instant::now();
        self.dispatcher.start(now);
        if let Some(path) = file {
            self.dispatcher.open_startup_path(path, now);
        }
    }

    pub fn run(mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;

        let result = self.run_loop();

        disable_raw_mode()?;
        execute!(stdout(), LeaveAlternateScreen)?;

        result
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        loop {
            self.render()?;

            let timeout = self
                .dispatcher
                .next_deadline()
                .map(|deadline| deadline.saturating_duration_since(Instant::now()))
                .unwrap_or(IDLE_POLL)
                .min(IDLE_POLL);

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key_event) => {
                        if self.handle_key(key_event) {
                            break;
                        }
                    }
                    Event::Resize(_, _) => self.view.force_redraw(),
                    _ => {}
                }
            }

            self.dispatcher.on_timer(Instant::now());
        }

        tracing::info!("session ended");
        Ok(())
    }

    fn render(&mut self) -> std::io::Result<()> {
        let view_model = SessionViewModel::new(self.dispatcher.session());
        let params = RenderParams {
            mode: &self.mode,
            line_input: &self.line_input,
            prompt_message: self.prompt.as_ref().map(|p| p.message.as_str()),
        };
        self.view.render(&view_model, &params)
    }

    /// Returns true when the editor should exit.
    pub fn handle_key(&mut self, key_event: KeyEvent) -> bool {
        if key_event.kind != KeyEventKind::Press {
            return false;
        }
        let Some(command) = KeyHandler::parse_key(&self.mode, &key_event) else {
            return false;
        };
        let outcome = self.execute(command, Instant::now());
        self.apply_outcome(outcome)
    }

    fn execute(&mut self, command: Command, now: Instant) -> Outcome {
        let d = &mut self.dispatcher;
        match command {
            Command::MoveLeft(extend) => navigate(d, |b| b.move_left(extend)),
            Command::MoveRight(extend) => navigate(d, |b| b.move_right(extend)),
            Command::MoveUp(extend) => navigate(d, |b| b.move_up(extend)),
            Command::MoveDown(extend) => navigate(d, |b| b.move_down(extend)),
            Command::MoveLineStart(extend) => navigate(d, |b| b.move_line_start(extend)),
            Command::MoveLineEnd(extend) => navigate(d, |b| b.move_line_end(extend)),
            Command::MoveDocumentStart(extend) => navigate(d, |b| b.move_document_start(extend)),
            Command::MoveDocumentEnd(extend) => navigate(d, |b| b.move_document_end(extend)),
            Command::ClearSelection => navigate(d, |b| b.clear_selection()),
            Command::SelectAll => navigate(d, |b| b.select_all()),

            Command::InsertChar(c) => d.input(TextEdit::InsertChar(c), now),
            Command::InsertNewline => d.input(TextEdit::Newline, now),
            Command::InsertTab => d.input(TextEdit::InsertChar('\t'), now),
            Command::DeleteBackward => d.input(TextEdit::Backspace, now),
            Command::DeleteForward => d.input(TextEdit::Delete, now),

            Command::Copy => self.copy_selection(false, now),
            Command::Cut => self.copy_selection(true, now),
            Command::Paste => self.paste(now),

            Command::Shortcut(key) => {
                let outcome = d.handle_shortcut(key, true, now).unwrap_or(Outcome::Continue);
                self.sync_focus_with_panel();
                if key == 'n' {
                    self.view.reset_scroll();
                }
                outcome
            }
            Command::TogglePanel => {
                let outcome = d.toggle_assistant_panel(now);
                self.sync_focus_with_panel();
                outcome
            }
            Command::FocusAssistant => {
                if d.session().panel_visible {
                    self.mode = if self.mode == Mode::Assistant { Mode::Editor } else { Mode::Assistant };
                }
                Outcome::Continue
            }
            Command::FontSizeUp => {
                let size = d.session().font_size.saturating_add(FONT_STEP);
                d.change_font_size(size, now)
            }
            Command::FontSizeDown => {
                let size = d.session().font_size.saturating_sub(FONT_STEP);
                d.change_font_size(size, now)
            }
            Command::Suggestion(action) => d.dispatch(EditorEvent::ApplySuggestion(action), now),

            Command::LineChar(c) => {
                self.line_input.push(c);
                Outcome::Continue
            }
            Command::LineBackspace => {
                self.line_input.pop();
                Outcome::Continue
            }
            Command::LineSubmit => {
                let line = std::mem::take(&mut self.line_input);
                match self.mode {
                    Mode::PathInput => {
                        self.close_prompt();
                        let outcome = self.dispatcher.resolve_path(Some(line), now);
                        self.view.reset_scroll();
                        outcome
                    }
                    _ => self.dispatcher.send_assistant_prompt(&line, now),
                }
            }
            Command::LineCancel => match self.mode {
                Mode::PathInput => {
                    self.close_prompt();
                    self.dispatcher.resolve_path(None, now)
                }
                _ => {
                    self.mode = Mode::Editor;
                    Outcome::Continue
                }
            },
            Command::Confirm(answer) => {
                self.close_prompt();
                self.dispatcher.resolve_confirmation(answer, now)
            }
            Command::Redraw => {
                self.view.force_redraw();
                Outcome::Continue
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Prompt(prompt) => {
                self.mode = Mode::from(prompt.kind);
                self.line_input = prompt.initial.clone();
                self.prompt = Some(prompt);
                false
            }
            Outcome::Quit => true,
            Outcome::Status(_) | Outcome::Continue => false,
        }
    }

    fn close_prompt(&mut self) {
        self.prompt = None;
        self.line_input.clear();
        self.mode = Mode::Editor;
    }

    /// Opening the panel moves typing to the chat input; closing it returns
    /// typing to the text.
    fn sync_focus_with_panel(&mut self) {
        if self.prompt.is_some() {
            return;
        }
        self.mode = if self.dispatcher.session().panel_visible {
            Mode::Assistant
        } else {
            Mode::Editor
        };
        self.line_input.clear();
    }

    fn copy_selection(&mut self, cut: bool, now: Instant) -> Outcome {
        let Some(text) = self.dispatcher.session().document.buffer().selected_text() else {
            return Outcome::Continue;
        };
        let Some(clipboard) = self.clipboard.as_mut() else {
            return self.dispatcher.report("Portapapeles no disponible", now);
        };
        if let Err(err) = clipboard.set_text(text) {
            tracing::warn!(error = %err, "clipboard write failed");
            return self.dispatcher.report("No se pudo copiar al portapapeles", now);
        }
        if cut {
            self.dispatcher.input(TextEdit::DeleteSelection, now)
        } else {
            self.dispatcher.report("Copiado", now)
        }
    }

    fn paste(&mut self, now: Instant) -> Outcome {
        let Some(clipboard) = self.clipboard.as_mut() else {
            return self.dispatcher.report("Portapapeles no disponible", now);
        };
        match clipboard.get_text() {
            Ok(text) if !text.is_empty() => self.dispatcher.input(TextEdit::InsertStr(text), now),
            Ok(_) => Outcome::Continue,
            Err(err) => {
                tracing::warn!(error = %err, "clipboard read failed");
                self.dispatcher.report("No se pudo pegar desde el portapapeles", now)
            }
        }
    }

    #[cfg(test)]
    fn session(&self) -> &EditorSession {
        self.dispatcher.session()
    }
}

fn navigate<H, F>(dispatcher: &mut CommandDispatcher<H>, f: F) -> Outcome
where
    H: HostBridge,
    F: FnOnce(&mut crate::document_model::TextBuffer),
{
    dispatcher.navigate(f);
    Outcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_model::DocumentState;
    use crate::host::FsHostBridge;
    use crossterm::event::{KeyCode, KeyModifiers};
    use tempfile::TempDir;

    fn controller() -> EditorController<FsHostBridge> {
        let mut controller = EditorController::new(FsHostBridge::new(), &RcConfig::default());
        controller.clipboard = None;
        controller
    }

    fn press(controller: &mut EditorController<FsHostBridge>, code: KeyCode) -> bool {
        controller.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(controller: &mut EditorController<FsHostBridge>, c: char) -> bool {
        controller.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn type_text(controller: &mut EditorController<FsHostBridge>, text: &str) {
        for c in text.chars() {
            press(controller, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_type_then_save_through_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nota.txt");
        let mut c = controller();

        type_text(&mut c, "hola mundo");
        assert_eq!(c.session().document.state(), DocumentState::Dirty);

        ctrl(&mut c, 's');
        assert_eq!(c.mode, Mode::PathInput);
        assert_eq!(c.line_input, "documento.txt");

        c.line_input = path.display().to_string();
        press(&mut c, KeyCode::Enter);

        assert_eq!(c.mode, Mode::Editor);
        assert_eq!(c.session().document.state(), DocumentState::Clean);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hola mundo");
    }

    #[test]
    fn test_open_file_through_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("leer.md");
        std::fs::write(&path, "uno\ndos tres").unwrap();
        let mut c = controller();

        ctrl(&mut c, 'o');
        assert_eq!(c.mode, Mode::PathInput);
        type_text(&mut c, &path.display().to_string());
        press(&mut c, KeyCode::Enter);

        assert_eq!(c.session().document.content(), "uno\ndos tres");
        assert_eq!(c.session().word_count_label(), "3 palabras");
        assert_eq!(c.session().status_message, "Archivo abierto: leer.md");
    }

    #[test]
    fn test_escape_cancels_path_prompt() {
        let mut c = controller();
        ctrl(&mut c, 'o');
        press(&mut c, KeyCode::Esc);
        assert_eq!(c.mode, Mode::Editor);
        assert_eq!(c.session().status_message, "Operación cancelada");
    }

    #[test]
    fn test_new_while_dirty_goes_through_confirm() {
        let mut c = controller();
        type_text(&mut c, "borrador");

        ctrl(&mut c, 'n');
        assert_eq!(c.mode, Mode::Confirm);
        press(&mut c, KeyCode::Esc);
        assert_eq!(c.session().document.content(), "borrador");

        ctrl(&mut c, 'n');
        press(&mut c, KeyCode::Char('n'));
        assert_eq!(c.session().document.state(), DocumentState::Empty);
    }

    #[test]
    fn test_quit() {
        let mut c = controller();
        assert!(ctrl(&mut c, 'q'));

        let mut c = controller();
        type_text(&mut c, "x");
        assert!(!ctrl(&mut c, 'q'));
        assert!(press(&mut c, KeyCode::Char('n')));
    }

    #[test]
    fn test_panel_focus_and_chat() {
        let mut c = controller();
        ctrl(&mut c, 'i');
        assert!(c.session().panel_visible);
        assert_eq!(c.mode, Mode::Assistant);

        let before = c.session().conversation.len();
        type_text(&mut c, "traducir esto");
        press(&mut c, KeyCode::Enter);
        assert_eq!(c.session().conversation.len(), before + 1);
        assert_eq!(c.session().document.content(), "");

        press(&mut c, KeyCode::Esc);
        assert_eq!(c.mode, Mode::Editor);
        assert!(c.session().panel_visible);

        press(&mut c, KeyCode::F(3));
        assert!(!c.session().panel_visible);
    }

    #[test]
    fn test_cursor_moves_do_not_dirty() {
        let mut c = controller();
        press(&mut c, KeyCode::Left);
        press(&mut c, KeyCode::End);
        assert_eq!(c.session().document.state(), DocumentState::Empty);
    }

    #[test]
    fn test_copy_without_clipboard_reports() {
        let mut c = controller();
        type_text(&mut c, "abc");
        ctrl(&mut c, 'a');
        ctrl(&mut c, 'c');
        assert_eq!(c.session().status_message, "Portapapeles no disponible");
        assert_eq!(c.session().document.content(), "abc");
    }

    #[test]
    fn test_font_size_keys() {
        let mut c = controller();
        ctrl(&mut c, '+');
        assert_eq!(c.session().font_size, 16);
        ctrl(&mut c, '-');
        ctrl(&mut c, '-');
        assert_eq!(c.session().font_size, 12);
    }
}
