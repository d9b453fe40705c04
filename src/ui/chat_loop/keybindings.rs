//! Mode-aware key resolution.
//!
//! Each UI mode maps to a [`KeyContext`]. Bindings are registered per context
//! and resolve a key press to at most one [`AppAction`]; unbound printable
//! keys fall through to text entry where the context accepts text.

use std::collections::HashMap;

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::app::{AppAction, ConfirmAnswer, EditOp, UiMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Terminal,
    Prompt,
    Confirm,
    Notice,
    Picker,
    Help,
}

impl KeyContext {
    pub fn from_ui_mode(mode: &UiMode) -> Self {
        match mode {
            UiMode::Terminal => KeyContext::Terminal,
            UiMode::Prompt(_) => KeyContext::Prompt,
            UiMode::Confirm(_) => KeyContext::Confirm,
            UiMode::Notice(_) => KeyContext::Notice,
            UiMode::ModelPicker(_) => KeyContext::Picker,
            UiMode::Help => KeyContext::Help,
        }
    }

    fn accepts_text(self) -> bool {
        matches!(self, KeyContext::Terminal | KeyContext::Prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPattern {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyPattern {
    pub fn simple(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    fn from_event(key: &KeyEvent) -> Self {
        // Shift is implied by the character itself.
        let modifiers = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        Self {
            code: key.code,
            modifiers,
        }
    }
}

type ActionFactory = fn() -> AppAction;

pub struct KeyRegistry {
    bindings: HashMap<(KeyContext, KeyPattern), ActionFactory>,
}

impl KeyRegistry {
    pub fn resolve(&self, context: KeyContext, key: &KeyEvent) -> Option<AppAction> {
        let pattern = KeyPattern::from_event(key);
        if let Some(factory) = self.bindings.get(&(context, pattern.clone())) {
            return Some(factory());
        }

        match pattern.code {
            KeyCode::Char(ch @ '1'..='9')
                if context == KeyContext::Terminal && pattern.modifiers == KeyModifiers::ALT =>
            {
                Some(AppAction::SelectTab {
                    index: ch as usize - '1' as usize,
                })
            }
            KeyCode::Char(ch) if context.accepts_text() && pattern.modifiers.is_empty() => {
                Some(AppAction::Edit(EditOp::Insert(ch.to_string())))
            }
            _ => None,
        }
    }
}

struct KeyRegistryBuilder {
    bindings: HashMap<(KeyContext, KeyPattern), ActionFactory>,
}

impl KeyRegistryBuilder {
    fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    fn register(
        mut self,
        contexts: &[KeyContext],
        pattern: KeyPattern,
        factory: ActionFactory,
    ) -> Self {
        for context in contexts {
            self.bindings.insert((*context, pattern.clone()), factory);
        }
        self
    }

    fn build(self) -> KeyRegistry {
        KeyRegistry {
            bindings: self.bindings,
        }
    }
}

const ALL: &[KeyContext] = &[
    KeyContext::Terminal,
    KeyContext::Prompt,
    KeyContext::Confirm,
    KeyContext::Notice,
    KeyContext::Picker,
    KeyContext::Help,
];
const TERMINAL: &[KeyContext] = &[KeyContext::Terminal];
const EDITING: &[KeyContext] = &[KeyContext::Terminal, KeyContext::Prompt];
const DISMISSABLE: &[KeyContext] = &[
    KeyContext::Prompt,
    KeyContext::Notice,
    KeyContext::Picker,
    KeyContext::Help,
];

/// Key summary shown by the help overlay.
pub const HELP_ENTRIES: &[(&str, &str)] = &[
    ("Enter", "Send the command line"),
    ("Up / Down", "Scroll one line"),
    ("PgUp / PgDn", "Scroll one page"),
    ("Ctrl+T", "New chat tab"),
    ("Ctrl+W", "Close chat tab"),
    ("Ctrl+PgUp / Ctrl+PgDn", "Previous / next tab"),
    ("Alt+1..9", "Jump to tab"),
    ("Ctrl+S", "Save chat"),
    ("Ctrl+O", "Open chat"),
    ("F2", "Rename tab"),
    ("F3", "Clear session"),
    ("F4", "Choose model"),
    ("F1", "This help"),
    ("Ctrl+Q / Ctrl+C", "Quit"),
];

pub fn build_registry() -> KeyRegistry {
    KeyRegistryBuilder::new()
        .register(ALL, KeyPattern::ctrl(KeyCode::Char('c')), || AppAction::Quit)
        .register(ALL, KeyPattern::ctrl(KeyCode::Char('q')), || AppAction::Quit)
        // Terminal
        .register(TERMINAL, KeyPattern::simple(KeyCode::Enter), || AppAction::Submit)
        .register(TERMINAL, KeyPattern::simple(KeyCode::Up), || {
            AppAction::ScrollLines { lines: 1 }
        })
        .register(TERMINAL, KeyPattern::simple(KeyCode::Down), || {
            AppAction::ScrollLines { lines: -1 }
        })
        .register(TERMINAL, KeyPattern::simple(KeyCode::PageUp), || {
            AppAction::ScrollPages { pages: 1 }
        })
        .register(TERMINAL, KeyPattern::simple(KeyCode::PageDown), || {
            AppAction::ScrollPages { pages: -1 }
        })
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::Char('t')), || AppAction::NewTab)
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::Char('w')), || AppAction::CloseTab)
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::PageDown), || {
            AppAction::CycleTab { delta: 1 }
        })
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::PageUp), || {
            AppAction::CycleTab { delta: -1 }
        })
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::Char('s')), || AppAction::BeginSave)
        .register(TERMINAL, KeyPattern::ctrl(KeyCode::Char('o')), || AppAction::BeginOpen)
        .register(TERMINAL, KeyPattern::simple(KeyCode::F(1)), || AppAction::ShowHelp)
        .register(TERMINAL, KeyPattern::simple(KeyCode::F(2)), || AppAction::BeginRename)
        .register(TERMINAL, KeyPattern::simple(KeyCode::F(3)), || AppAction::BeginClear)
        .register(TERMINAL, KeyPattern::simple(KeyCode::F(4)), || {
            AppAction::OpenModelPicker
        })
        // Line editing
        .register(EDITING, KeyPattern::simple(KeyCode::Backspace), || {
            AppAction::Edit(EditOp::Backspace)
        })
        .register(EDITING, KeyPattern::simple(KeyCode::Delete), || {
            AppAction::Edit(EditOp::Delete)
        })
        .register(EDITING, KeyPattern::simple(KeyCode::Left), || {
            AppAction::Edit(EditOp::Left)
        })
        .register(EDITING, KeyPattern::simple(KeyCode::Right), || {
            AppAction::Edit(EditOp::Right)
        })
        .register(EDITING, KeyPattern::simple(KeyCode::Home), || {
            AppAction::Edit(EditOp::Home)
        })
        .register(EDITING, KeyPattern::simple(KeyCode::End), || {
            AppAction::Edit(EditOp::End)
        })
        // Dialogs
        .register(DISMISSABLE, KeyPattern::simple(KeyCode::Esc), || {
            AppAction::DismissOverlay
        })
        .register(&[KeyContext::Prompt], KeyPattern::simple(KeyCode::Enter), || {
            AppAction::PromptSubmit
        })
        .register(
            &[KeyContext::Notice, KeyContext::Help],
            KeyPattern::simple(KeyCode::Enter),
            || AppAction::DismissOverlay,
        )
        .register(&[KeyContext::Confirm], KeyPattern::simple(KeyCode::Char('y')), || {
            AppAction::Confirm(ConfirmAnswer::Yes)
        })
        .register(&[KeyContext::Confirm], KeyPattern::simple(KeyCode::Char('Y')), || {
            AppAction::Confirm(ConfirmAnswer::Yes)
        })
        .register(&[KeyContext::Confirm], KeyPattern::simple(KeyCode::Char('n')), || {
            AppAction::Confirm(ConfirmAnswer::No)
        })
        .register(&[KeyContext::Confirm], KeyPattern::simple(KeyCode::Char('N')), || {
            AppAction::Confirm(ConfirmAnswer::No)
        })
        .register(&[KeyContext::Confirm], KeyPattern::simple(KeyCode::Esc), || {
            AppAction::Confirm(ConfirmAnswer::Cancel)
        })
        // Model picker
        .register(&[KeyContext::Picker], KeyPattern::simple(KeyCode::Up), || {
            AppAction::PickerMove { delta: -1 }
        })
        .register(&[KeyContext::Picker], KeyPattern::simple(KeyCode::Down), || {
            AppAction::PickerMove { delta: 1 }
        })
        .register(&[KeyContext::Picker], KeyPattern::simple(KeyCode::PageUp), || {
            AppAction::PickerMove { delta: -10 }
        })
        .register(&[KeyContext::Picker], KeyPattern::simple(KeyCode::PageDown), || {
            AppAction::PickerMove { delta: 10 }
        })
        .register(&[KeyContext::Picker], KeyPattern::simple(KeyCode::Enter), || {
            AppAction::PickerSelect
        })
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn enter_depends_on_context() {
        let registry = build_registry();
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert!(matches!(
            registry.resolve(KeyContext::Terminal, &enter),
            Some(AppAction::Submit)
        ));
        assert!(matches!(
            registry.resolve(KeyContext::Prompt, &enter),
            Some(AppAction::PromptSubmit)
        ));
        assert!(matches!(
            registry.resolve(KeyContext::Picker, &enter),
            Some(AppAction::PickerSelect)
        ));
        assert!(registry.resolve(KeyContext::Confirm, &enter).is_none());
    }

    #[test]
    fn printable_keys_become_text_only_where_text_is_accepted() {
        let registry = build_registry();
        let upper_a = key(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert!(matches!(
            registry.resolve(KeyContext::Terminal, &upper_a),
            Some(AppAction::Edit(EditOp::Insert(ref text))) if text == "A"
        ));
        assert!(registry.resolve(KeyContext::Notice, &upper_a).is_none());
    }

    #[test]
    fn control_chords_are_not_typed() {
        let registry = build_registry();
        let ctrl_x = key(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert!(registry.resolve(KeyContext::Terminal, &ctrl_x).is_none());
    }

    #[test]
    fn quit_works_everywhere() {
        let registry = build_registry();
        let ctrl_q = key(KeyCode::Char('q'), KeyModifiers::CONTROL);
        for context in ALL {
            assert!(matches!(
                registry.resolve(*context, &ctrl_q),
                Some(AppAction::Quit)
            ));
        }
    }

    #[test]
    fn alt_digits_select_tabs() {
        let registry = build_registry();
        let alt_3 = key(KeyCode::Char('3'), KeyModifiers::ALT);
        assert!(matches!(
            registry.resolve(KeyContext::Terminal, &alt_3),
            Some(AppAction::SelectTab { index: 2 })
        ));
    }

    #[test]
    fn confirm_answers() {
        let registry = build_registry();
        let esc = key(KeyCode::Esc, KeyModifiers::NONE);
        let yes = key(KeyCode::Char('Y'), KeyModifiers::SHIFT);
        assert!(matches!(
            registry.resolve(KeyContext::Confirm, &esc),
            Some(AppAction::Confirm(ConfirmAnswer::Cancel))
        ));
        assert!(matches!(
            registry.resolve(KeyContext::Confirm, &yes),
            Some(AppAction::Confirm(ConfirmAnswer::Yes))
        ));
    }

    #[test]
    fn up_scrolls_toward_older_output() {
        let registry = build_registry();
        let up = key(KeyCode::Up, KeyModifiers::NONE);
        assert!(matches!(
            registry.resolve(KeyContext::Terminal, &up),
            Some(AppAction::ScrollLines { lines: 1 })
        ));
    }
}
