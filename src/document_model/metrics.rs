//! Word and cursor metrics shown in the status bar.
//!
//! Offsets are counted in characters, not bytes. Both functions are total:
//! an offset past the end of the text is clamped to the text length.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMetrics {
    pub line: usize,
    pub column: usize,
}

impl CursorMetrics {
    pub fn label(&self) -> String {
        format!("Línea {}, Columna {}", self.line, self.column)
    }
}

pub fn word_count(text: &str) -> usize {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return 0;
    }
    trimmed.split_whitespace().count()
}

pub fn word_count_label(count: usize) -> String {
    if count == 1 {
        format!("{count} palabra")
    } else {
        format!("{count} palabras")
    }
}

pub fn cursor_metrics(text: &str, offset: usize) -> CursorMetrics {
    let mut line = 1;
    let mut last_newline: Option<usize> = None;

    for (i, ch) in text.chars().take(offset).enumerate() {
        if ch == '\n' {
            line += 1;
            last_newline = Some(i);
        }
    }

    let offset = offset.min(text.chars().count());
    let column = match last_newline {
        Some(index) => offset - index,
        None => offset + 1,
    };

    CursorMetrics { line, column }
}
