use super::metrics::{self, CursorMetrics};
use super::text_buffer::TextBuffer;
use std::path::{Path, PathBuf};

pub const UNTITLED: &str = "Sin título";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No filename and no unsaved edits.
    Empty,
    /// Content matches the last file read or written.
    Clean,
    /// Content changed since the last load or save.
    Dirty,
}

/// The single open document: text, where it lives on disk, and whether it
/// has unsaved changes.
///
/// `dirty` is false only right after creation, a successful open or a
/// successful save. Every text input sets it, even one that leaves the
/// content unchanged.
#[derive(Debug, Clone)]
pub struct Document {
    buffer: TextBuffer,
    filename: Option<PathBuf>,
    dirty: bool,
}

impl Document {
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            filename: None,
            dirty: false,
        }
    }

    /// Replace content and filename with a file that was just read.
    pub fn open(&mut self, path: PathBuf, content: String) {
        self.buffer = TextBuffer::from_string(content);
        self.filename = Some(path);
        self.dirty = false;
    }

    /// Replace the whole content. Always dirties.
    pub fn edit(&mut self, new_content: String) {
        self.buffer.set_text(new_content);
        self.dirty = true;
    }

    /// Apply a keystroke-level change to the text. Always dirties.
    pub fn input<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextBuffer),
    {
        f(&mut self.buffer);
        self.dirty = true;
    }

    /// Cursor and selection changes; never dirties.
    pub fn navigate<F>(&mut self, f: F)
    where
        F: FnOnce(&mut TextBuffer),
    {
        f(&mut self.buffer);
    }

    /// Record a successful write of the current content to `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.filename = Some(path);
        self.dirty = false;
    }

    pub fn state(&self) -> DocumentState {
        if self.dirty {
            DocumentState::Dirty
        } else if self.filename.is_some() {
            DocumentState::Clean
        } else {
            DocumentState::Empty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn content(&self) -> &str {
        self.buffer.text()
    }

    /// Content as it should be written to disk.
    pub fn file_content(&self) -> String {
        self.buffer.to_file_content()
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn display_name(&self) -> String {
        self.filename
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(UNTITLED)
            .to_string()
    }

    pub fn word_count(&self) -> usize {
        metrics::word_count(self.content())
    }

    pub fn cursor_metrics(&self) -> CursorMetrics {
        metrics::cursor_metrics(self.content(), self.buffer.cursor())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
