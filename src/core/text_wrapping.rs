//! Character wrapping for the terminal surface.
//!
//! The surface is wrapped by display column rather than by word so that every
//! byte offset maps to exactly one visual cell. That keeps the insertion
//! cursor and the scroll arithmetic in step with what is drawn; ratatui's own
//! `Wrap` does not expose where it breaks lines.

use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrappedSurface {
    pub lines: Vec<String>,
    /// Visual `(line, column)` of the requested byte offset.
    pub cursor: Option<(usize, usize)>,
}

impl WrappedSurface {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Break `text` into rows at most `width` columns wide and locate `cursor`.
///
/// Hard newlines always start a new row. A cursor sitting exactly at the
/// right edge moves to the start of an extra empty row, as a terminal would.
pub fn wrap_surface(text: &str, width: usize, cursor: Option<usize>) -> WrappedSurface {
    let width = width.max(1);
    let mut lines = vec![String::new()];
    let mut col = 0usize;
    let mut cursor_pos = None;

    for (offset, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(0);
        if ch != '\n' && col > 0 && col + ch_width > width {
            lines.push(String::new());
            col = 0;
        }
        if cursor == Some(offset) {
            cursor_pos = Some((lines.len() - 1, col));
        }
        if ch == '\n' {
            lines.push(String::new());
            col = 0;
        } else if let Some(line) = lines.last_mut() {
            line.push(ch);
            col += ch_width;
        }
    }

    if cursor == Some(text.len()) {
        if col >= width {
            lines.push(String::new());
            col = 0;
        }
        cursor_pos = Some((lines.len() - 1, col));
    }

    WrappedSurface {
        lines,
        cursor: cursor_pos,
    }
}
