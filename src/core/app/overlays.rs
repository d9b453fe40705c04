use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    SaveChat { close_after: bool },
    OpenChat,
    RenameTab,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::SaveChat { .. } => "Save Chat",
            PromptKind::OpenChat => "Open Chat",
            PromptKind::RenameTab => "Rename Chat",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PromptKind::SaveChat { .. } => "Save to file:",
            PromptKind::OpenChat => "Open file:",
            PromptKind::RenameTab => "Enter new chat name:",
        }
    }
}

/// Single-line text entry shown in a dialog box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextPrompt {
    pub kind: PromptKind,
    text: String,
    cursor: usize,
}

impl TextPrompt {
    pub fn new(kind: PromptKind, initial: impl Into<String>) -> Self {
        let text = initial.into();
        let cursor = text.len();
        Self { kind, text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_str(&mut self, s: &str) {
        // Dialog inputs are single line.
        let line: String = s.chars().filter(|c| *c != '\n').collect();
        self.text.insert_str(self.cursor, &line);
        self.cursor += line.len();
    }

    pub fn backspace(&mut self) {
        if let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
        }
    }

    pub fn delete(&mut self) {
        if let Some(grapheme) = self.text[self.cursor..].graphemes(true).next() {
            let end = self.cursor + grapheme.len();
            self.text.replace_range(self.cursor..end, "");
        }
    }

    pub fn move_left(&mut self) {
        if let Some((start, _)) = self.text[..self.cursor].grapheme_indices(true).next_back() {
            self.cursor = start;
        }
    }

    pub fn move_right(&mut self) {
        if let Some(grapheme) = self.text[self.cursor..].graphemes(true).next() {
            self.cursor += grapheme.len();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmKind {
    ClearSession,
    CloseTab,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub kind: ConfirmKind,
}

impl Confirmation {
    pub fn new(kind: ConfirmKind) -> Self {
        Self { kind }
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            ConfirmKind::ClearSession => "Clear Session",
            ConfirmKind::CloseTab => "Close Chat",
        }
    }

    pub fn question(&self) -> &'static str {
        match self.kind {
            ConfirmKind::ClearSession => {
                "Are you sure you want to clear the current session? This cannot be undone."
            }
            ConfirmKind::CloseTab => "Do you want to save the chat before closing?",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self.kind {
            ConfirmKind::ClearSession => "[Y]es  [N]o",
            ConfirmKind::CloseTab => "[Y]es  [N]o  [Esc] Cancel",
        }
    }
}

/// A blocking message; any dismissal key returns to the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelPicker {
    Loading,
    Ready { models: Vec<String>, selected: usize },
}

impl ModelPicker {
    pub fn ready(models: Vec<String>, current: &str) -> Self {
        let selected = models.iter().position(|m| m == current).unwrap_or(0);
        ModelPicker::Ready { models, selected }
    }

    pub fn move_selection(&mut self, delta: isize) {
        if let ModelPicker::Ready { models, selected } = self {
            if models.is_empty() {
                return;
            }
            let last = models.len() as isize - 1;
            *selected = (*selected as isize + delta).clamp(0, last) as usize;
        }
    }

    pub fn selected_model(&self) -> Option<&str> {
        match self {
            ModelPicker::Ready { models, selected } => models.get(*selected).map(String::as_str),
            ModelPicker::Loading => None,
        }
    }
}
