use super::view_model::ViewModel;
use crate::assistant::AssistantMessage;
use crate::controller::Mode;
use crossterm::{
    cursor, execute, queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType, size},
};
use std::io::{self, Write, stdout};
use unicode_width::UnicodeWidthChar;

const HINTS: &str = "^N Nuevo  ^O Abrir  ^S Guardar  ^I/F3 IA  F2 Chat  F5-F8 Sugerencias  ^Q Salir";

#[derive(Clone)]
pub struct RenderParams<'a> {
    pub mode: &'a Mode,
    /// Text typed into the assistant prompt or the path prompt
    pub line_input: &'a str,
    /// Question shown on the bottom row while a prompt is open
    pub prompt_message: Option<&'a str>,
}

pub struct View {
    last_frame: Vec<String>,
    last_terminal_size: (u16, u16),
    scroll_offset: usize,
    horizontal_scroll: usize,
    needs_full_redraw: bool,
    show_line_numbers: bool,
    tab_stop: usize,
}

impl View {
    pub fn new() -> Self {
        Self {
            last_frame: Vec::new(),
            last_terminal_size: (0, 0),
            scroll_offset: 0,
            horizontal_scroll: 0,
            needs_full_redraw: true,
            show_line_numbers: false,
            tab_stop: 4,
        }
    }

    pub fn render(&mut self, view_model: &dyn ViewModel, params: &RenderParams<'_>) -> io::Result<()> {
        let (width, height) = size()?;
        let current_size = (width, height);
        if self.last_terminal_size != current_size {
            self.needs_full_redraw = true;
            self.last_terminal_size = current_size;
        }

        let mut out = stdout();
        if self.needs_full_redraw {
            execute!(out, Clear(ClearType::All))?;
            self.last_frame.clear();
            self.needs_full_redraw = false;
        }

        let (frame, cursor_pos) = self.compose(view_model, params, width as usize, height as usize);

        // Only redraw changed rows
        for (row, line) in frame.iter().enumerate() {
            if self.last_frame.get(row) != Some(line) {
                queue!(
                    out,
                    cursor::MoveTo(0, row as u16),
                    Clear(ClearType::CurrentLine),
                    Print(line)
                )?;
            }
        }
        self.last_frame = frame;

        queue!(out, cursor::MoveTo(cursor_pos.1 as u16, cursor_pos.0 as u16))?;
        out.flush()
    }

    /// Build every screen row plus the terminal cursor (row, column).
    fn compose(
        &mut self,
        view_model: &dyn ViewModel,
        params: &RenderParams<'_>,
        width: usize,
        height: usize,
    ) -> (Vec<String>, (usize, usize)) {
        let mut frame = Vec::with_capacity(height);
        if height < 4 || width < 10 {
            frame.push(clip_to_width(&view_model.title(), width));
            return (frame, (0, 0));
        }

        // Title, body rows, status bar, prompt row
        let body_rows = height - 3;
        let (text_width, panel_width) = if view_model.panel_visible() {
            let panel = (width / 3).max(20).min(width.saturating_sub(10));
            (width - panel - 1, panel)
        } else {
            (width, 0)
        };

        frame.push(styled(&pad_to_width(&view_model.title(), width), Attribute::Reverse));

        let gutter = self.gutter_width(view_model);
        let text_area = text_width.saturating_sub(gutter).max(1);
        self.adjust_scroll_to_cursor(view_model, body_rows, text_area);

        let panel_lines = if panel_width > 0 {
            compose_panel(view_model.messages(), params, panel_width, body_rows)
        } else {
            Vec::new()
        };

        for row in 0..body_rows {
            let line_idx = self.scroll_offset + row;
            let mut line = String::new();
            if line_idx < view_model.get_line_count() {
                if gutter > 0 {
                    line.push_str(&format!("{:>width$} ", line_idx + 1, width = gutter - 1));
                }
                let text = view_model.get_line(line_idx).unwrap_or_default();
                let selection = view_model.get_selection_on_line(line_idx);
                line.push_str(&self.render_text_line(&text, text_area, selection));
            } else {
                line.push('~');
                line.push_str(&" ".repeat(text_width - 1));
            }
            if panel_width > 0 {
                line.push('│');
                line.push_str(panel_lines.get(row).map(String::as_str).unwrap_or(""));
            }
            frame.push(line);
        }

        let status = view_model.status_segments().join(" | ");
        frame.push(styled(&pad_to_width(&status, width), Attribute::Reverse));

        let bottom = match params.prompt_message {
            Some(message) => format!("{} {}", message, params.line_input),
            None => HINTS.to_string(),
        };
        frame.push(clip_to_width(&bottom, width));

        let cursor_pos = match params.mode {
            Mode::Editor => {
                let cursor = view_model.get_cursor_position();
                let line = view_model.get_line(cursor.line).unwrap_or_default();
                let column = self.calculate_display_column(&line, cursor.column);
                (
                    cursor.line.saturating_sub(self.scroll_offset) + 1,
                    column.saturating_sub(self.horizontal_scroll) + gutter,
                )
            }
            Mode::Assistant => {
                let typed = display_width(&format!("> {}", params.line_input));
                (body_rows, (text_width + 1 + typed).min(width - 1))
            }
            Mode::Confirm | Mode::PathInput => {
                let message = params.prompt_message.unwrap_or("");
                let typed = display_width(&format!("{} {}", message, params.line_input));
                (height - 1, typed.min(width - 1))
            }
        };

        (frame, cursor_pos)
    }

    /// Expand tabs, apply horizontal scroll and reverse-video the selection.
    fn render_text_line(&self, text: &str, width: usize, selection: Option<(usize, usize)>) -> String {
        let mut result = String::new();
        let mut display_col = 0;
        let mut used = 0;
        let mut in_selection = false;

        for (i, ch) in text.chars().enumerate() {
            let (glyph, ch_width) = match ch {
                '\t' => {
                    let next_stop = ((display_col / self.tab_stop) + 1) * self.tab_stop;
                    (" ".repeat(next_stop - display_col), next_stop - display_col)
                }
                c => match control_glyph(c) {
                    Some(glyph) => (glyph, 2),
                    None => (c.to_string(), c.width().unwrap_or(1)),
                },
            };
            let start = display_col;
            display_col += ch_width;

            if start < self.horizontal_scroll {
                continue;
            }
            if used + ch_width > width {
                break;
            }

            let selected = selection.is_some_and(|(s, e)| i >= s && i < e);
            if selected && !in_selection {
                result.push_str(&format!("{}", SetAttribute(Attribute::Reverse)));
                in_selection = true;
            } else if !selected && in_selection {
                result.push_str(&format!("{}", SetAttribute(Attribute::NoReverse)));
                in_selection = false;
            }
            result.push_str(&glyph);
            used += ch_width;
        }

        if in_selection {
            result.push_str(&format!("{}", SetAttribute(Attribute::NoReverse)));
        }
        result.push_str(&" ".repeat(width - used));
        result
    }

    fn gutter_width(&self, view_model: &dyn ViewModel) -> usize {
        if self.show_line_numbers {
            (view_model.get_line_count().to_string().len() + 1).max(4)
        } else {
            0
        }
    }

    pub fn force_redraw(&mut self) {
        self.needs_full_redraw = true;
    }

    pub fn reset_scroll(&mut self) {
        self.scroll_offset = 0;
        self.horizontal_scroll = 0;
        self.needs_full_redraw = true;
    }

    pub fn set_line_numbers(&mut self, show: bool) {
        if self.show_line_numbers != show {
            self.show_line_numbers = show;
            self.needs_full_redraw = true;
        }
    }

    pub fn set_tab_stop(&mut self, tab_stop: usize) {
        if self.tab_stop != tab_stop && tab_stop > 0 {
            self.tab_stop = tab_stop;
            self.needs_full_redraw = true;
        }
    }

    fn adjust_scroll_to_cursor(&mut self, view_model: &dyn ViewModel, visible_lines: usize, width: usize) {
        let cursor_pos = view_model.get_cursor_position();
        let line = view_model.get_line(cursor_pos.line).unwrap_or_default();
        let cursor_column = self.calculate_display_column(&line, cursor_pos.column);

        // Vertical
        if cursor_pos.line < self.scroll_offset {
            self.scroll_offset = cursor_pos.line;
        } else if cursor_pos.line >= self.scroll_offset + visible_lines {
            self.scroll_offset = cursor_pos.line + 1 - visible_lines;
        }

        // Horizontal
        if cursor_column < self.horizontal_scroll {
            self.horizontal_scroll = cursor_column;
        } else if cursor_column >= self.horizontal_scroll + width {
            self.horizontal_scroll = cursor_column + 1 - width;
        }
    }

    /// Convert logical character position to display column position
    /// Accounts for tab expansion and Unicode character widths
    fn calculate_display_column(&self, text: &str, logical_pos: usize) -> usize {
        let mut display_col = 0;
        for c in text.chars().take(logical_pos) {
            match c {
                '\t' => display_col = ((display_col / self.tab_stop) + 1) * self.tab_stop,
                c if control_glyph(c).is_some() => display_col += 2,
                c => display_col += c.width().unwrap_or(1),
            }
        }
        display_col
    }
}

impl Default for View {
    fn default() -> Self {
        Self::new()
    }
}

/// Assistant panel rows: wrapped messages, newest at the bottom, with the
/// prompt input on the last row.
fn compose_panel(
    messages: &[AssistantMessage],
    params: &RenderParams<'_>,
    width: usize,
    rows: usize,
) -> Vec<String> {
    let mut wrapped = Vec::new();
    for message in messages {
        let text = format!("{}: {}", message.sender.label(), message.text);
        wrapped.extend(wrap(&text, width));
        wrapped.push(String::new());
    }

    let history_rows = rows.saturating_sub(1);
    let skip = wrapped.len().saturating_sub(history_rows);
    let mut lines: Vec<String> = wrapped.into_iter().skip(skip).collect();
    while lines.len() < history_rows {
        lines.push(String::new());
    }

    let input = format!("> {}", params.line_input);
    let input = if *params.mode == Mode::Assistant {
        styled(&pad_to_width(&input, width), Attribute::Underlined)
    } else {
        clip_to_width(&input, width)
    };
    lines.push(input);
    lines
}

fn styled(text: &str, attribute: Attribute) -> String {
    format!("{}{}{}", SetAttribute(attribute), text, SetAttribute(Attribute::Reset))
}

/// Caret notation for control characters (`^[` for ESC, `^?` for DEL) so
/// file content never reaches the terminal as escape sequences. C1 controls
/// have no caret form and show as `^?` too.
fn control_glyph(c: char) -> Option<String> {
    if c == '\t' || !c.is_control() {
        return None;
    }
    let glyph = match u8::try_from(c) {
        Ok(byte) if byte < 0x80 => char::from(byte ^ 0x40),
        _ => '?',
    };
    Some(format!("^{glyph}"))
}

/// Text with every control character (tabs included) made printable.
fn printable(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\t' => " ".to_string(),
            c => control_glyph(c).unwrap_or_else(|| c.to_string()),
        })
        .collect()
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(0)).sum()
}

fn clip_to_width(text: &str, width: usize) -> String {
    let text = printable(text);
    let mut result = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        result.push(c);
        used += w;
    }
    result
}

fn pad_to_width(text: &str, width: usize) -> String {
    let clipped = clip_to_width(text, width);
    let used = display_width(&clipped);
    format!("{}{}", clipped, " ".repeat(width - used))
}

/// Greedy word wrap by display width; words longer than a row are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let text = printable(text);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut used = 0;

    for word in text.split_whitespace() {
        let word_width = display_width(word);
        let needed = if current.is_empty() { word_width } else { word_width + 1 };
        if used + needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            used += needed;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            used = 0;
        }
        for c in word.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            current.push(c);
            used += w;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
