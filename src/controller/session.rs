use crate::assistant::Conversation;
use crate::document_model::{Document, word_count_label};

pub const READY: &str = "Listo";

/// Everything the editor shows, owned by the dispatcher.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub document: Document,
    pub conversation: Conversation,
    pub panel_visible: bool,
    pub font_size: u16,
    pub status_message: String,
}

impl EditorSession {
    pub fn new(font_size: u16, panel_visible: bool) -> Self {
        Self {
            document: Document::new(),
            conversation: Conversation::with_welcome(),
            panel_visible,
            font_size,
            status_message: READY.to_string(),
        }
    }

    pub fn title(&self) -> String {
        let marker = if self.document.is_dirty() { " [+]" } else { "" };
        format!("Block de Notas IA - {}{}", self.document.display_name(), marker)
    }

    pub fn word_count_label(&self) -> String {
        word_count_label(self.document.word_count())
    }

    pub fn cursor_label(&self) -> String {
        self.document.cursor_metrics().label()
    }

    pub fn font_size_label(&self) -> String {
        format!("{}px", self.font_size)
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(14, false)
    }
}
