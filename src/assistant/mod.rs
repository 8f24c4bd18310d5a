//! Assistant panel - Canned replies and the append-only conversation
//!
//! There is no model behind this: a prompt is matched against a fixed,
//! ordered keyword table and the first hit wins.

pub const WELCOME: &str = "¡Hola! Soy tu asistente de IA. Puedo ayudarte a corregir, resumir, expandir o traducir tu texto. ¿En qué puedo ayudarte?";

const DEFAULT_REPLY: &str =
    "Entiendo tu consulta. ¿Podrías ser más específico sobre qué necesitas?";

/// Scan order matters: the first keyword contained in the prompt is used.
const REPLIES: &[(&str, &str)] = &[
    (
        "corregir",
        "He revisado tu texto y aquí están las correcciones sugeridas...",
    ),
    ("resumir", "Aquí tienes un resumen de tu texto..."),
    ("expandir", "Te sugiero expandir estas ideas..."),
    ("traducir", "Aquí está la traducción de tu texto..."),
];

/// Characters of the selection echoed back by a suggestion.
pub const SUGGESTION_ECHO_CHARS: usize = 50;

pub fn reply(prompt: &str) -> &'static str {
    let lower = prompt.to_lowercase();
    REPLIES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, response)| *response)
        .unwrap_or(DEFAULT_REPLY)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionAction {
    Correct,
    Summarize,
    Expand,
    Translate,
}

impl SuggestionAction {
    pub const ALL: [SuggestionAction; 4] = [
        SuggestionAction::Correct,
        SuggestionAction::Summarize,
        SuggestionAction::Expand,
        SuggestionAction::Translate,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            SuggestionAction::Correct => "corregir",
            SuggestionAction::Summarize => "resumir",
            SuggestionAction::Expand => "expandir",
            SuggestionAction::Translate => "traducir",
        }
    }

    fn echo_prefix(&self) -> &'static str {
        match self {
            SuggestionAction::Correct => "Correcciones para el texto",
            SuggestionAction::Summarize => "Resumen del texto",
            SuggestionAction::Expand => "Ideas para expandir",
            SuggestionAction::Translate => "Traducción del texto",
        }
    }

    /// Assistant message echoing the first characters of `text`.
    pub fn echo(&self, text: &str) -> String {
        let excerpt: String = text.chars().take(SUGGESTION_ECHO_CHARS).collect();
        format!("{}: \"{}...\"", self.echo_prefix(), excerpt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn label(&self) -> &'static str {
        match self {
            Sender::User => "Tú",
            Sender::Assistant => "IA",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantMessage {
    pub sender: Sender,
    pub text: String,
}

/// Ordered message history. Messages are only ever appended.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<AssistantMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_welcome() -> Self {
        let mut conversation = Self::new();
        conversation.push(Sender::Assistant, WELCOME);
        conversation
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) {
        self.messages.push(AssistantMessage {
            sender,
            text: text.into(),
        });
    }

    pub fn messages(&self) -> &[AssistantMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
