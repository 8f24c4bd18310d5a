use crate::assistant::{self, Sender, SuggestionAction};
use crate::config::{MAX_FONT_SIZE, MIN_FONT_SIZE, Timings};
use crate::controller::scheduler::{Debounce, Scheduler};
use crate::controller::session::{EditorSession, READY};
use crate::document_model::{Document, Selection, TextBuffer};
use crate::host::{self, HostBridge, HostError};
use std::path::{Path, PathBuf};
use std::time::Instant;

pub const DEFAULT_SAVE_NAME: &str = "documento.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerTask {
    AutoSave,
    AssistantReply(String),
    StatusReset,
}

/// What a confirmed (or saved-first) discard goes on to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    NewDocument,
    OpenDocument,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Confirm(Intent),
    OpenPath,
    SavePath { then: Option<Intent> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    /// Save first, then continue.
    Save,
    /// Drop unsaved changes and continue.
    Discard,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Confirm,
    Path,
}

/// A question the controller must put to the user before the dispatcher
/// can continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub message: String,
    pub initial: String,
}

impl Prompt {
    fn confirm(message: &str) -> Self {
        Self {
            kind: PromptKind::Confirm,
            message: format!("{message} (s: guardar, n: descartar, Esc: cancelar)"),
            initial: String::new(),
        }
    }

    fn open_path() -> Self {
        Self {
            kind: PromptKind::Path,
            message: format!("Abrir archivo ({}):", host::KNOWN_EXTENSIONS.join(", ")),
            initial: String::new(),
        }
    }

    fn save_path(suggested: &str) -> Self {
        Self {
            kind: PromptKind::Path,
            message: "Guardar como:".to_string(),
            initial: suggested.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing to report.
    Continue,
    Status(String),
    Prompt(Prompt),
    Quit,
}

/// Keystroke-level text changes. Each one is an edit and dirties the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    InsertChar(char),
    InsertStr(String),
    Newline,
    Backspace,
    Delete,
    DeleteSelection,
}

impl TextEdit {
    fn apply(self, buffer: &mut TextBuffer) {
        match self {
            TextEdit::InsertChar(ch) => buffer.insert_char(ch),
            TextEdit::InsertStr(s) => buffer.insert_str(&s),
            TextEdit::Newline => buffer.insert_newline(),
            TextEdit::Backspace => {
                buffer.delete_backward();
            }
            TextEdit::Delete => {
                buffer.delete_forward();
            }
            TextEdit::DeleteSelection => {
                buffer.delete_selection();
            }
        }
    }
}

/// Discrete inputs to the editor, consumed by `CommandDispatcher::dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    Edit(String),
    Input(TextEdit),
    NewDocument,
    OpenDocument,
    SaveDocument,
    ToggleAssistantPanel,
    SendAssistantPrompt(String),
    ApplySuggestion(SuggestionAction),
    ChangeFontSize(u16),
    Shortcut { key: char, ctrl: bool },
    Confirm(ConfirmAnswer),
    Path(Option<String>),
    RequestQuit,
    TimerFired,
}

/// Maps user actions onto the editor session.
///
/// All transitions happen synchronously on the caller's thread. Anything
/// that needs an answer from the user (a path, a confirmation) parks a single
/// pending request and returns `Outcome::Prompt`; the controller answers it
/// with `resolve_path` or `resolve_confirmation`. While a request is parked,
/// other file commands are refused, so two saves can never overlap.
pub struct CommandDispatcher<H: HostBridge> {
    session: EditorSession,
    host: H,
    timings: Timings,
    scheduler: Scheduler<TimerTask>,
    autosave: Debounce,
    status_reset: Debounce,
    pending: Option<Pending>,
}

impl<H: HostBridge> CommandDispatcher<H> {
    pub fn new(host: H, session: EditorSession, timings: Timings) -> Self {
        Self {
            session,
            host,
            timings,
            scheduler: Scheduler::new(),
            autosave: Debounce::new(),
            status_reset: Debounce::new(),
            pending: None,
        }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn has_pending_request(&self) -> bool {
        self.pending.is_some()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn start(&mut self, now: Instant) -> Outcome {
        tracing::info!("session started");
        self.report("Aplicación iniciada correctamente", now)
    }

    pub fn dispatch(&mut self, event: EditorEvent, now: Instant) -> Outcome {
        match event {
            EditorEvent::Edit(content) => self.edit(content, now),
            EditorEvent::Input(edit) => self.input(edit, now),
            EditorEvent::NewDocument => self.new_document(now),
            EditorEvent::OpenDocument => self.open_document(now),
            EditorEvent::SaveDocument => self.save_document(now),
            EditorEvent::ToggleAssistantPanel => self.toggle_assistant_panel(now),
            EditorEvent::SendAssistantPrompt(prompt) => self.send_assistant_prompt(&prompt, now),
            EditorEvent::ApplySuggestion(action) => {
                let selection = self.session.document.buffer().selection();
                self.apply_suggestion(action, selection, now)
            }
            EditorEvent::ChangeFontSize(size) => self.change_font_size(size, now),
            EditorEvent::Shortcut { key, ctrl } => self
                .handle_shortcut(key, ctrl, now)
                .unwrap_or(Outcome::Continue),
            EditorEvent::Confirm(answer) => self.resolve_confirmation(answer, now),
            EditorEvent::Path(path) => self.resolve_path(path, now),
            EditorEvent::RequestQuit => self.request_quit(now),
            EditorEvent::TimerFired => {
                self.on_timer(now);
                Outcome::Continue
            }
        }
    }

    // Editing

    pub fn edit(&mut self, content: String, now: Instant) -> Outcome {
        self.session.document.edit(content);
        self.after_edit(now)
    }

    pub fn input(&mut self, edit: TextEdit, now: Instant) -> Outcome {
        self.session.document.input(|buffer| edit.apply(buffer));
        self.after_edit(now)
    }

    /// Cursor and selection movement. Not an edit.
    pub fn navigate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextBuffer),
    {
        self.session.document.navigate(f);
    }

    fn after_edit(&mut self, now: Instant) -> Outcome {
        self.autosave.restart(
            &mut self.scheduler,
            now,
            self.timings.autosave_delay,
            TimerTask::AutoSave,
        );
        self.report("Modificado", now)
    }

    // File commands

    pub fn new_document(&mut self, now: Instant) -> Outcome {
        if self.pending.is_some() {
            return self.busy(now);
        }
        if self.session.document.is_dirty() {
            self.pending = Some(Pending::Confirm(Intent::NewDocument));
            return Outcome::Prompt(Prompt::confirm(
                "¿Deseas guardar los cambios antes de crear un nuevo archivo?",
            ));
        }
        self.perform(Intent::NewDocument, now)
    }

    pub fn open_document(&mut self, now: Instant) -> Outcome {
        if self.pending.is_some() {
            return self.busy(now);
        }
        if self.session.document.is_dirty() {
            self.pending = Some(Pending::Confirm(Intent::OpenDocument));
            return Outcome::Prompt(Prompt::confirm(
                "¿Deseas guardar los cambios antes de abrir otro archivo?",
            ));
        }
        self.perform(Intent::OpenDocument, now)
    }

    /// Read `path` and make it the current document. The document is left
    /// untouched when the read fails.
    pub fn open_path(&mut self, path: PathBuf, now: Instant) -> Outcome {
        match self.host.read_file(&path) {
            Ok(content) => {
                if !host::has_known_extension(&path) {
                    tracing::warn!(file = %path.display(), "opening file with unlisted extension");
                }
                tracing::info!(file = %path.display(), "document opened");
                self.session.document.open(path, content);
                self.autosave.cancel(&mut self.scheduler);
                let name = self.session.document.display_name();
                self.report(&format!("Archivo abierto: {name}"), now)
            }
            Err(err) => {
                tracing::warn!(error = %err, "open failed");
                self.report(&format!("Error al abrir el archivo: {err}"), now)
            }
        }
    }

    /// Startup variant of `open_path`: a missing file becomes a new, empty
    /// document bound to that path.
    pub fn open_startup_path(&mut self, path: PathBuf, now: Instant) -> Outcome {
        match self.host.read_file(&path) {
            Err(err) if err.is_not_found() => {
                tracing::info!(file = %path.display(), "starting new file");
                self.session.document = Document::new();
                self.session.document.mark_saved(path);
                let name = self.session.document.display_name();
                self.report(&format!("\"{name}\" [Archivo nuevo]"), now)
            }
            Ok(content) => {
                self.session.document.open(path, content);
                let name = self.session.document.display_name();
                self.report(&format!("Archivo abierto: {name}"), now)
            }
            Err(err) => {
                tracing::warn!(error = %err, "startup open failed");
                self.report(&format!("Error al abrir el archivo: {err}"), now)
            }
        }
    }

    pub fn save_document(&mut self, now: Instant) -> Outcome {
        if self.pending.is_some() {
            return self.busy(now);
        }
        let Some(path) = self.session.document.filename().map(Path::to_path_buf) else {
            self.pending = Some(Pending::SavePath { then: None });
            return Outcome::Prompt(Prompt::save_path(DEFAULT_SAVE_NAME));
        };
        if !self.session.document.is_dirty() {
            let name = self.session.document.display_name();
            return self.report(&format!("Sin cambios que guardar: {name}"), now);
        }
        match self.write_document(path) {
            Ok(()) => self.report_saved(now),
            Err(err) => self.report_write_error(&err, now),
        }
    }

    pub fn request_quit(&mut self, now: Instant) -> Outcome {
        if self.pending.is_some() {
            return self.busy(now);
        }
        if self.session.document.is_dirty() {
            self.pending = Some(Pending::Confirm(Intent::Quit));
            return Outcome::Prompt(Prompt::confirm(
                "Hay cambios sin guardar. ¿Deseas guardarlos antes de salir?",
            ));
        }
        self.perform(Intent::Quit, now)
    }

    pub fn resolve_confirmation(&mut self, answer: ConfirmAnswer, now: Instant) -> Outcome {
        let Some(Pending::Confirm(intent)) = self.pending else {
            return Outcome::Continue;
        };
        self.pending = None;

        match answer {
            ConfirmAnswer::Cancel => self.report("Operación cancelada", now),
            ConfirmAnswer::Discard => {
                tracing::info!(?intent, "unsaved changes discarded");
                self.autosave.cancel(&mut self.scheduler);
                self.perform(intent, now)
            }
            ConfirmAnswer::Save => match self.session.document.filename().map(Path::to_path_buf) {
                Some(path) => match self.write_document(path) {
                    Ok(()) => self.perform(intent, now),
                    Err(err) => self.report_write_error(&err, now),
                },
                None => {
                    self.pending = Some(Pending::SavePath { then: Some(intent) });
                    Outcome::Prompt(Prompt::save_path(DEFAULT_SAVE_NAME))
                }
            },
        }
    }

    /// Answer a path prompt. `None` or a blank path cancels: no state changes.
    pub fn resolve_path(&mut self, path: Option<String>, now: Instant) -> Outcome {
        let pending = match self.pending {
            Some(Pending::OpenPath) | Some(Pending::SavePath { .. }) => self.pending.take(),
            _ => return Outcome::Continue,
        };
        let path = path
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        let Some(path) = path else {
            return self.report("Operación cancelada", now);
        };

        match pending {
            Some(Pending::OpenPath) => self.open_path(path, now),
            Some(Pending::SavePath { then }) => match self.write_document(path) {
                Ok(()) => match then {
                    Some(intent) => self.perform(intent, now),
                    None => self.report_saved(now),
                },
                Err(err) => self.report_write_error(&err, now),
            },
            _ => Outcome::Continue,
        }
    }

    fn perform(&mut self, intent: Intent, now: Instant) -> Outcome {
        match intent {
            Intent::NewDocument => {
                self.session.document = Document::new();
                self.autosave.cancel(&mut self.scheduler);
                tracing::info!("new document");
                self.report("Nuevo archivo creado", now)
            }
            Intent::OpenDocument => {
                self.pending = Some(Pending::OpenPath);
                Outcome::Prompt(Prompt::open_path())
            }
            Intent::Quit => Outcome::Quit,
        }
    }

    fn write_document(&mut self, path: PathBuf) -> Result<(), HostError> {
        if !host::has_known_extension(&path) {
            tracing::warn!(file = %path.display(), "saving file with unlisted extension");
        }
        let content = self.session.document.file_content();
        self.host.write_file(&path, &content)?;
        tracing::info!(file = %path.display(), size_bytes = content.len(), "document saved");
        self.session.document.mark_saved(path);
        self.autosave.cancel(&mut self.scheduler);
        Ok(())
    }

    fn report_saved(&mut self, now: Instant) -> Outcome {
        let name = self.session.document.display_name();
        self.report(&format!("Archivo guardado: {name}"), now)
    }

    fn report_write_error(&mut self, err: &HostError, now: Instant) -> Outcome {
        tracing::warn!(error = %err, "save failed");
        self.report(&format!("Error al guardar el archivo: {err}"), now)
    }

    fn busy(&mut self, now: Instant) -> Outcome {
        self.report("Hay una operación pendiente", now)
    }

    // Timers

    /// Run every task that is due. Returns true if anything ran.
    pub fn on_timer(&mut self, now: Instant) -> bool {
        let due = self.scheduler.take_due(now);
        let fired = !due.is_empty();
        for task in due {
            match task {
                TimerTask::AutoSave => self.auto_save(now),
                TimerTask::AssistantReply(prompt) => {
                    self.session
                        .conversation
                        .push(Sender::Assistant, assistant::reply(&prompt));
                }
                TimerTask::StatusReset => {
                    self.session.status_message = READY.to_string();
                }
            }
        }
        fired
    }

    fn auto_save(&mut self, now: Instant) {
        if !self.session.document.is_dirty() {
            return;
        }
        let Some(path) = self.session.document.filename().map(Path::to_path_buf) else {
            tracing::debug!("auto-save skipped: document has no filename");
            return;
        };
        match self.write_document(path) {
            Ok(()) => {
                self.report("Guardado automático", now);
            }
            Err(err) => {
                tracing::warn!(error = %err, "auto-save failed");
                self.report(&format!("Error en guardado automático: {err}"), now);
            }
        }
    }

    // Assistant and display

    pub fn toggle_assistant_panel(&mut self, now: Instant) -> Outcome {
        self.session.panel_visible = !self.session.panel_visible;
        if self.session.panel_visible {
            self.report("Panel de IA abierto", now)
        } else {
            self.report("Panel de IA cerrado", now)
        }
    }

    /// Post a prompt; the reply lands after the assistant delay. Several
    /// prompts in flight are answered in send order.
    pub fn send_assistant_prompt(&mut self, prompt: &str, now: Instant) -> Outcome {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Outcome::Continue;
        }
        self.session.conversation.push(Sender::User, prompt);
        self.scheduler.schedule(
            now,
            self.timings.assistant_delay,
            TimerTask::AssistantReply(prompt.to_string()),
        );
        Outcome::Continue
    }

    /// Echo the selection (or the whole text when nothing is selected).
    pub fn apply_suggestion(
        &mut self,
        action: SuggestionAction,
        selection: Option<Selection>,
        now: Instant,
    ) -> Outcome {
        let buffer = self.session.document.buffer();
        let text = match selection.filter(|sel| !sel.is_empty()) {
            Some(sel) => buffer.slice(sel.start, sel.end),
            None => buffer.text().to_string(),
        };
        self.session
            .conversation
            .push(Sender::Assistant, action.echo(&text));
        self.report(&format!("Acción de IA: {}", action.keyword()), now)
    }

    pub fn change_font_size(&mut self, size: u16, now: Instant) -> Outcome {
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size) {
            return self.report(&format!("Tamaño de fuente no válido: {size}px"), now);
        }
        self.session.font_size = size;
        self.report(&format!("Tamaño de fuente cambiado a {size}px"), now)
    }

    /// Ctrl shortcuts. `None` means the key is not a shortcut and keeps its
    /// normal meaning; `Some` means it was consumed.
    pub fn handle_shortcut(&mut self, key: char, ctrl: bool, now: Instant) -> Option<Outcome> {
        if !ctrl {
            return None;
        }
        match key.to_ascii_lowercase() {
            'n' => Some(self.new_document(now)),
            'o' => Some(self.open_document(now)),
            's' => Some(self.save_document(now)),
            'i' => Some(self.toggle_assistant_panel(now)),
            'q' => Some(self.request_quit(now)),
            _ => None,
        }
    }

    pub fn report(&mut self, message: &str, now: Instant) -> Outcome {
        self.session.status_message = message.to_string();
        self.status_reset.restart(
            &mut self.scheduler,
            now,
            self.timings.status_timeout,
            TimerTask::StatusReset,
        );
        Outcome::Status(message.to_string())
    }
}
