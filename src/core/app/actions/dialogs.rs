use std::path::PathBuf;

use super::{App, AppAction, AppCommand, ConfirmAnswer};
use crate::core::app::{ConfirmKind, Confirmation, PromptKind, TextPrompt, UiMode};
use crate::core::chat_file::{
    default_file_name, load_chat, save_chat, tab_title_for, with_default_extension,
};
use crate::core::config::data::path_display;

pub(super) fn handle_dialog_action(app: &mut App, action: AppAction) -> Option<AppCommand> {
    match action {
        AppAction::CloseTab => {
            app.mode = UiMode::Confirm(Confirmation::new(ConfirmKind::CloseTab));
        }
        AppAction::BeginSave => begin_save(app, false),
        AppAction::BeginOpen => {
            app.mode = UiMode::Prompt(TextPrompt::new(PromptKind::OpenChat, ""));
        }
        AppAction::BeginRename => {
            let title = app
                .active_session()
                .map(|session| session.title.clone())
                .unwrap_or_default();
            app.mode = UiMode::Prompt(TextPrompt::new(PromptKind::RenameTab, title));
        }
        AppAction::BeginClear => {
            app.mode = UiMode::Confirm(Confirmation::new(ConfirmKind::ClearSession));
        }
        AppAction::ShowHelp => app.mode = UiMode::Help,
        AppAction::PromptSubmit => submit_prompt(app),
        AppAction::Confirm(answer) => answer_confirmation(app, answer),
        AppAction::DismissOverlay => app.mode = UiMode::Terminal,
        _ => {}
    }
    None
}

fn begin_save(app: &mut App, close_after: bool) {
    let Some(session) = app.active_session() else {
        return;
    };
    let suggested = default_file_name(&session.title);
    app.mode = UiMode::Prompt(TextPrompt::new(
        PromptKind::SaveChat { close_after },
        suggested,
    ));
}

fn submit_prompt(app: &mut App) {
    let UiMode::Prompt(prompt) = std::mem::replace(&mut app.mode, UiMode::Terminal) else {
        return;
    };
    let input = prompt.text().trim();
    if input.is_empty() {
        return;
    }

    match prompt.kind {
        PromptKind::SaveChat { close_after } => save_active_chat(app, input, close_after),
        PromptKind::OpenChat => open_chat(app, input),
        PromptKind::RenameTab => {
            if let Some(session) = app.active_session_mut() {
                session.title = input.to_string();
            }
        }
    }
}

fn save_active_chat(app: &mut App, input: &str, close_after: bool) {
    let Some(session) = app.active_session() else {
        return;
    };
    let path = with_default_extension(input);

    match save_chat(&path, session.transcript.turns()) {
        Ok(()) => {
            app.set_status(format!("Saved chat to {}", path_display(&path)));
            if close_after {
                app.close_active_tab();
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "saving chat failed");
            app.show_notice("Error", err.to_string());
        }
    }
}

fn open_chat(app: &mut App, input: &str) {
    let mut path = PathBuf::from(input);
    if !path.exists() {
        path = with_default_extension(path);
    }

    match load_chat(&path) {
        Ok(turns) => {
            let session = app.open_session(tab_title_for(&path));
            session.restore_from_transcript(turns);
            app.set_status(format!("Opened {}", path_display(&path)));
        }
        Err(err) => {
            tracing::warn!(error = %err, "opening chat failed");
            app.show_notice("Error", err.to_string());
        }
    }
}

fn answer_confirmation(app: &mut App, answer: ConfirmAnswer) {
    let UiMode::Confirm(confirmation) = std::mem::replace(&mut app.mode, UiMode::Terminal) else {
        return;
    };

    match (confirmation.kind, answer) {
        (ConfirmKind::ClearSession, ConfirmAnswer::Yes) => {
            let Some(session) = app.active_session_mut() else {
                return;
            };
            if let Err(busy) = session.clear() {
                app.set_status(busy.to_string());
            }
        }
        (ConfirmKind::CloseTab, ConfirmAnswer::Yes) => begin_save(app, true),
        (ConfirmKind::CloseTab, ConfirmAnswer::No) => app.close_active_tab(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::app::actions::{apply_action, AppActionContext, EditOp};
    use crate::core::message::{Turn, DEFAULT_SYSTEM_PROMPT};
    use crate::utils::test_utils::{config_with_key, create_test_app};
    use tempfile::TempDir;

    fn act(app: &mut App, action: AppAction) {
        apply_action(app, action, AppActionContext::default());
    }

    fn replace_prompt_text(app: &mut App, text: &str) {
        if let UiMode::Prompt(prompt) = &mut app.mode {
            *prompt = TextPrompt::new(prompt.kind, text);
        }
    }

    #[test]
    fn save_prompt_is_prefilled_with_tab_title() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::BeginSave);
        let UiMode::Prompt(prompt) = &app.mode else {
            panic!("expected save prompt");
        };
        assert_eq!(prompt.text(), "Chat.lpt");
        assert_eq!(prompt.kind, PromptKind::SaveChat { close_after: false });
    }

    #[test]
    fn save_then_open_restores_into_new_tab() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("Project");
        let mut app = create_test_app(config_with_key());
        {
            let session = app.active_session_mut().unwrap();
            session.transcript.push_user("hello");
            session.transcript.push_assistant("Hi there!");
        }

        act(&mut app, AppAction::BeginSave);
        replace_prompt_text(&mut app, target.to_str().unwrap());
        act(&mut app, AppAction::PromptSubmit);
        assert!(dir.path().join("Project.lpt").exists());

        act(&mut app, AppAction::BeginOpen);
        replace_prompt_text(&mut app, dir.path().join("Project.lpt").to_str().unwrap());
        act(&mut app, AppAction::PromptSubmit);

        assert_eq!(app.sessions.len(), 2);
        assert_eq!(app.active, 1);
        let opened = app.active_session().unwrap();
        assert_eq!(opened.title, "Project");
        assert_eq!(
            opened.transcript.turns(),
            &[
                Turn::system(DEFAULT_SYSTEM_PROMPT),
                Turn::user("hello"),
                Turn::assistant("Hi there!"),
            ]
        );
        assert_eq!(
            opened.buffer.text(),
            format!("{DEFAULT_SYSTEM_PROMPT}\n> hello\nHi there!\n> ")
        );
    }

    #[test]
    fn opening_a_missing_file_shows_notice() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::BeginOpen);
        replace_prompt_text(&mut app, dir.path().join("nope.lpt").to_str().unwrap());
        act(&mut app, AppAction::PromptSubmit);

        let UiMode::Notice(notice) = &app.mode else {
            panic!("expected a notice");
        };
        assert!(notice.message.starts_with("Failed to open chat"));
        assert_eq!(app.sessions.len(), 1);
    }

    #[test]
    fn rename_updates_active_title() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::BeginRename);
        act(&mut app, AppAction::Edit(EditOp::Insert(" 2".to_string())));
        act(&mut app, AppAction::PromptSubmit);
        assert_eq!(app.active_session().unwrap().title, "Chat 2");
        assert!(matches!(app.mode, UiMode::Terminal));
    }

    #[test]
    fn blank_rename_keeps_title() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::BeginRename);
        replace_prompt_text(&mut app, "   ");
        act(&mut app, AppAction::PromptSubmit);
        assert_eq!(app.active_session().unwrap().title, "Chat");
    }

    #[test]
    fn clear_needs_confirmation() {
        let mut app = create_test_app(config_with_key());
        app.active_session_mut().unwrap().transcript.push_user("hello");

        act(&mut app, AppAction::BeginClear);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::No));
        assert_eq!(app.active_session().unwrap().transcript.len(), 2);

        act(&mut app, AppAction::BeginClear);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::Yes));
        assert_eq!(app.active_session().unwrap().transcript.len(), 1);
    }

    #[test]
    fn close_without_saving_removes_tab() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::NewTab);
        act(&mut app, AppAction::CloseTab);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::No));
        assert_eq!(app.sessions.len(), 1);
        assert!(!app.exit_requested);
    }

    #[test]
    fn cancelling_close_keeps_tab() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::CloseTab);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::Cancel));
        assert_eq!(app.sessions.len(), 1);
        assert!(matches!(app.mode, UiMode::Terminal));
    }

    #[test]
    fn closing_last_tab_exits() {
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::CloseTab);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::No));
        assert!(app.exit_requested);
    }

    #[test]
    fn close_with_save_writes_then_closes() {
        let dir = TempDir::new().unwrap();
        let mut app = create_test_app(config_with_key());
        act(&mut app, AppAction::NewTab);
        act(&mut app, AppAction::CloseTab);
        act(&mut app, AppAction::Confirm(ConfirmAnswer::Yes));
        replace_prompt_text(&mut app, dir.path().join("kept").to_str().unwrap());
        act(&mut app, AppAction::PromptSubmit);

        assert!(dir.path().join("kept.lpt").exists());
        assert_eq!(app.sessions.len(), 1);
    }
}
