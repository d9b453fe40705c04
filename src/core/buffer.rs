//! Append-only terminal surface with an editable tail.
//!
//! Everything before the cursor boundary is prior output and can never be
//! edited; everything after it is the command line currently being typed.
//! Offsets are byte offsets into the surface and always sit on character
//! boundaries.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

pub const PROMPT: &str = "> ";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionBuffer {
    text: String,
    boundary: usize,
    cursor: usize,
    prompt_open: bool,
    placeholder: Option<Range<usize>>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn boundary(&self) -> usize {
        self.boundary
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_prompt_open(&self) -> bool {
        self.prompt_open
    }

    /// Text typed after the cursor boundary.
    pub fn input(&self) -> &str {
        &self.text[self.boundary..]
    }

    /// Start a fresh command line at the end of the surface.
    pub fn open_prompt(&mut self) {
        if !self.text.is_empty() && !self.text.ends_with('\n') {
            self.text.push('\n');
        }
        self.text.push_str(PROMPT);
        self.seal();
        self.prompt_open = true;
    }

    /// Append immutable output. Closes any open prompt.
    pub fn append_output(&mut self, output: &str) {
        self.text.push_str(output);
        self.seal();
        self.prompt_open = false;
    }

    /// Take the current command line.
    ///
    /// Returns the trimmed input and seals it (plus a newline) into prior
    /// output. Whitespace-only input leaves the buffer untouched.
    pub fn commit(&mut self) -> Option<String> {
        if !self.prompt_open {
            return None;
        }
        let trimmed = self.input().trim();
        if trimmed.is_empty() {
            return None;
        }
        let committed = trimmed.to_string();
        self.text.push('\n');
        self.seal();
        self.prompt_open = false;
        Some(committed)
    }

    pub fn push_placeholder(&mut self, token: &str) {
        let start = self.text.len();
        self.append_output(token);
        self.placeholder = Some(start..self.text.len());
    }

    /// Remove the placeholder inserted by [`push_placeholder`](Self::push_placeholder).
    ///
    /// Only the recorded range is removed, and only while it still holds
    /// `token`; identical text elsewhere on the surface is left alone.
    pub fn remove_placeholder(&mut self, token: &str) -> bool {
        let Some(range) = self.placeholder.take() else {
            return false;
        };
        if self.text.get(range.clone()) != Some(token) {
            tracing::warn!(?range, "placeholder range no longer matches token");
            return false;
        }
        self.text.replace_range(range, "");
        self.seal();
        true
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.placeholder = None;
        self.prompt_open = false;
        self.seal();
    }

    pub fn insert_str(&mut self, s: &str) -> bool {
        if !self.prompt_open || s.is_empty() {
            return false;
        }
        self.snap();
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        true
    }

    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_str(ch.encode_utf8(&mut buf))
    }

    /// Delete the grapheme before the cursor. A no-op at the boundary.
    pub fn backspace(&mut self) -> bool {
        if !self.prompt_open {
            return false;
        }
        self.snap();
        let Some(start) = self.previous_grapheme_start() else {
            return false;
        };
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    pub fn delete(&mut self) -> bool {
        if !self.prompt_open {
            return false;
        }
        self.snap();
        let Some(end) = self.next_grapheme_end() else {
            return false;
        };
        self.text.replace_range(self.cursor..end, "");
        true
    }

    pub fn move_left(&mut self) {
        self.snap();
        if let Some(start) = self.previous_grapheme_start() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        self.snap();
        if let Some(end) = self.next_grapheme_end() {
            self.cursor = end;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = self.boundary;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Place the insertion point, snapping it forward onto the editable tail.
    pub fn set_cursor(&mut self, pos: usize) {
        let mut pos = pos.clamp(self.boundary, self.text.len());
        while !self.text.is_char_boundary(pos) {
            pos += 1;
        }
        self.cursor = pos;
    }

    fn snap(&mut self) {
        if self.cursor < self.boundary {
            self.cursor = self.boundary;
        }
    }

    fn seal(&mut self) {
        self.boundary = self.text.len();
        self.cursor = self.boundary;
    }

    fn previous_grapheme_start(&self) -> Option<usize> {
        self.text[self.boundary..self.cursor]
            .grapheme_indices(true)
            .next_back()
            .map(|(offset, _)| self.boundary + offset)
    }

    fn next_grapheme_end(&self) -> Option<usize> {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map(|grapheme| self.cursor + grapheme.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt_with(input: &str) -> SessionBuffer {
        let mut buffer = SessionBuffer::new();
        buffer.open_prompt();
        buffer.insert_str(input);
        buffer
    }

    #[test]
    fn open_prompt_on_empty_surface() {
        let mut buffer = SessionBuffer::new();
        buffer.open_prompt();
        assert_eq!(buffer.text(), "> ");
        assert_eq!(buffer.boundary(), 2);
        assert!(buffer.is_prompt_open());
    }

    #[test]
    fn open_prompt_adds_newline_only_when_missing() {
        let mut buffer = SessionBuffer::new();
        buffer.append_output("output");
        buffer.open_prompt();
        assert_eq!(buffer.text(), "output\n> ");

        let mut buffer = SessionBuffer::new();
        buffer.append_output("output\n");
        buffer.open_prompt();
        assert_eq!(buffer.text(), "output\n> ");
    }

    #[test]
    fn backspace_at_boundary_is_noop() {
        let mut buffer = SessionBuffer::new();
        buffer.append_output("already sent\n");
        buffer.open_prompt();
        let before = buffer.text().to_string();
        assert!(!buffer.backspace());
        assert_eq!(buffer.text(), before);
        assert!(buffer.len() >= buffer.boundary());
    }

    #[test]
    fn repeated_backspace_never_crosses_boundary() {
        let mut buffer = prompt_with("ab");
        let boundary = buffer.boundary();
        for _ in 0..10 {
            buffer.backspace();
            assert!(buffer.len() >= boundary);
        }
        assert_eq!(buffer.text(), "> ");
    }

    #[test]
    fn cursor_before_boundary_snaps_back() {
        let mut buffer = prompt_with("hello");
        buffer.set_cursor(0);
        assert_eq!(buffer.cursor(), buffer.boundary());
        buffer.insert_char('x');
        assert_eq!(buffer.text(), "> xhello");
    }

    #[test]
    fn editing_is_grapheme_aware() {
        let mut buffer = prompt_with("café👍🏽");
        buffer.backspace();
        assert_eq!(buffer.input(), "café");
        buffer.move_left();
        buffer.delete();
        assert_eq!(buffer.input(), "caf");
        buffer.move_home();
        buffer.move_left();
        assert_eq!(buffer.cursor(), buffer.boundary());
        buffer.move_end();
        assert_eq!(buffer.cursor(), buffer.len());
    }

    #[test]
    fn commit_trims_and_seals_input() {
        let mut buffer = prompt_with("  hello  ");
        assert_eq!(buffer.commit().as_deref(), Some("hello"));
        assert_eq!(buffer.text(), ">   hello  \n");
        assert_eq!(buffer.boundary(), buffer.len());
        assert!(!buffer.is_prompt_open());
        assert!(!buffer.insert_char('x'));
    }

    #[test]
    fn whitespace_only_commit_changes_nothing() {
        let mut buffer = prompt_with("   \t ");
        let before = buffer.clone();
        assert_eq!(buffer.commit(), None);
        assert_eq!(buffer, before);
    }

    #[test]
    fn placeholder_removal_only_touches_inserted_range() {
        let mut buffer = SessionBuffer::new();
        buffer.open_prompt();
        buffer.insert_str("[Thinking...]");
        buffer.commit();
        buffer.push_placeholder("[Thinking...]\n");
        assert_eq!(buffer.text(), "> [Thinking...]\n[Thinking...]\n");

        assert!(buffer.remove_placeholder("[Thinking...]\n"));
        assert_eq!(buffer.text(), "> [Thinking...]\n");
        assert!(!buffer.remove_placeholder("[Thinking...]\n"));
        assert_eq!(buffer.text(), "> [Thinking...]\n");
    }

    #[test]
    fn clear_resets_surface() {
        let mut buffer = prompt_with("abc");
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.boundary(), 0);
        assert!(!buffer.is_prompt_open());
    }
}
