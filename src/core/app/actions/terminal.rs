use super::{App, AppAction, AppActionContext, AppCommand, EditOp};
use crate::core::app::{UiMode, DEFAULT_TAB_TITLE};
use crate::core::buffer::SessionBuffer;
use crate::core::dispatch::begin_request;
use crate::core::render::render_outcome;

pub(super) fn handle_terminal_action(
    app: &mut App,
    action: AppAction,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match action {
        AppAction::Edit(op) => {
            apply_edit(app, op);
            None
        }
        AppAction::Submit => submit_active_line(app),
        AppAction::ScrollLines { lines } => {
            scroll_active(app, lines);
            None
        }
        AppAction::ScrollPages { pages } => {
            scroll_active(app, pages.saturating_mul(ctx.surface_height() as i64));
            None
        }
        AppAction::NewTab => {
            app.open_session(DEFAULT_TAB_TITLE);
            None
        }
        AppAction::CycleTab { delta } => {
            app.cycle_tab(delta);
            None
        }
        AppAction::SelectTab { index } => {
            app.select_tab(index);
            None
        }
        AppAction::RequestCompleted(outcome) => {
            let Some(session) = app.session_mut(outcome.session_id) else {
                tracing::debug!(session = outcome.session_id, "dropping outcome for closed tab");
                return None;
            };
            if let Some(image) = render_outcome(session, outcome) {
                app.show_popup(image);
            }
            None
        }
        AppAction::DismissPopup => {
            app.popup = None;
            None
        }
        AppAction::SetStatus { message } => {
            app.set_status(message);
            None
        }
        AppAction::ClearStatus => {
            app.clear_status();
            None
        }
        AppAction::Quit => {
            app.request_exit();
            None
        }
        _ => None,
    }
}

fn apply_edit(app: &mut App, op: EditOp) {
    if let UiMode::Prompt(prompt) = &mut app.mode {
        match op {
            EditOp::Insert(text) => prompt.insert_str(&text),
            EditOp::Backspace => prompt.backspace(),
            EditOp::Delete => prompt.delete(),
            EditOp::Left => prompt.move_left(),
            EditOp::Right => prompt.move_right(),
            EditOp::Home => prompt.move_home(),
            EditOp::End => prompt.move_end(),
        }
        return;
    }
    if !matches!(app.mode, UiMode::Terminal) {
        return;
    }
    if let Some(session) = app.active_session_mut() {
        if edit_buffer(&mut session.buffer, op) {
            session.viewport.follow_tail();
        }
    }
}

/// Returns whether the surface changed.
fn edit_buffer(buffer: &mut SessionBuffer, op: EditOp) -> bool {
    match op {
        EditOp::Insert(text) => buffer.insert_str(&text),
        EditOp::Backspace => buffer.backspace(),
        EditOp::Delete => buffer.delete(),
        EditOp::Left => {
            buffer.move_left();
            false
        }
        EditOp::Right => {
            buffer.move_right();
            false
        }
        EditOp::Home => {
            buffer.move_home();
            false
        }
        EditOp::End => {
            buffer.move_end();
            false
        }
    }
}

fn submit_active_line(app: &mut App) -> Option<AppCommand> {
    let request_id = app.next_request_id();
    let session = app.active_session_mut()?;

    match session.commit_line() {
        Ok(Some(line)) => {
            let params = begin_request(session, request_id, &line);
            app.clear_status();
            Some(AppCommand::SpawnRequest(params))
        }
        Ok(None) => None,
        Err(busy) => {
            app.set_status(busy.to_string());
            None
        }
    }
}

fn scroll_active(app: &mut App, lines: i64) {
    if let Some(session) = app.active_session_mut() {
        session.viewport.scroll_by(lines);
    }
}
