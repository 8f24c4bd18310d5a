/// Document model subsystem - Core data structures and text operations
///
/// This module contains the single editable document, its text storage and
/// the word/cursor metrics derived from it.

pub mod document;
pub mod metrics;
pub mod text_buffer;

// Re-export main types for convenience
pub use document::{Document, DocumentState, UNTITLED};
pub use metrics::{CursorMetrics, cursor_metrics, word_count, word_count_label};
pub use text_buffer::{LineEnding, Selection, TextBuffer};
