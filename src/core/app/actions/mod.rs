mod dialogs;
mod picker;
mod terminal;

use tokio::sync::mpsc;

use super::App;
use crate::core::dispatch::{RequestOutcome, RequestParams};

/// A single editing operation, applied to whichever input has focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Insert(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAnswer {
    Yes,
    No,
    Cancel,
}

#[derive(Debug)]
pub enum AppAction {
    Edit(EditOp),
    Submit,
    /// Positive values scroll toward older output.
    ScrollLines {
        lines: i64,
    },
    ScrollPages {
        pages: i64,
    },
    NewTab,
    CloseTab,
    CycleTab {
        delta: isize,
    },
    SelectTab {
        index: usize,
    },
    BeginSave,
    BeginOpen,
    BeginRename,
    BeginClear,
    ShowHelp,
    PromptSubmit,
    Confirm(ConfirmAnswer),
    DismissOverlay,
    DismissPopup,
    OpenModelPicker,
    PickerMove {
        delta: isize,
    },
    PickerSelect,
    ModelsLoaded {
        models: Vec<String>,
    },
    ModelsLoadFailed {
        error: String,
    },
    RequestCompleted(RequestOutcome),
    SetStatus {
        message: String,
    },
    ClearStatus,
    Quit,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppActionContext {
    pub term_width: u16,
    pub term_height: u16,
}

impl AppActionContext {
    /// Rows available to the terminal surface, below the tab bar and above
    /// the status line.
    pub fn surface_height(&self) -> u16 {
        self.term_height.saturating_sub(2).max(1)
    }
}

pub struct AppActionEnvelope {
    pub action: AppAction,
    pub context: AppActionContext,
}

#[derive(Clone)]
pub struct AppActionDispatcher {
    tx: mpsc::UnboundedSender<AppActionEnvelope>,
}

impl AppActionDispatcher {
    pub fn new(tx: mpsc::UnboundedSender<AppActionEnvelope>) -> Self {
        Self { tx }
    }

    pub fn dispatch(&self, action: AppAction, ctx: AppActionContext) {
        self.dispatch_many([action], ctx);
    }

    pub fn dispatch_many<I>(&self, actions: I, ctx: AppActionContext)
    where
        I: IntoIterator<Item = AppAction>,
    {
        for action in actions.into_iter() {
            // The loop owns the receiver; a closed channel means it is gone.
            let _ = self.tx.send(AppActionEnvelope {
                action,
                context: ctx,
            });
        }
    }
}

/// Work the event loop must start outside the UI task.
#[derive(Debug)]
pub enum AppCommand {
    SpawnRequest(RequestParams),
    LoadModels { api_key: String },
}

pub fn apply_actions(
    app: &mut App,
    envelopes: impl IntoIterator<Item = AppActionEnvelope>,
) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    for envelope in envelopes {
        if let Some(cmd) = apply_action(app, envelope.action, envelope.context) {
            commands.push(cmd);
        }
    }
    commands
}

pub fn apply_action(app: &mut App, action: AppAction, ctx: AppActionContext) -> Option<AppCommand> {
    match action {
        AppAction::Edit(_)
        | AppAction::Submit
        | AppAction::ScrollLines { .. }
        | AppAction::ScrollPages { .. }
        | AppAction::NewTab
        | AppAction::CycleTab { .. }
        | AppAction::SelectTab { .. }
        | AppAction::RequestCompleted(_)
        | AppAction::DismissPopup
        | AppAction::SetStatus { .. }
        | AppAction::ClearStatus
        | AppAction::Quit => terminal::handle_terminal_action(app, action, ctx),

        AppAction::CloseTab
        | AppAction::BeginSave
        | AppAction::BeginOpen
        | AppAction::BeginRename
        | AppAction::BeginClear
        | AppAction::ShowHelp
        | AppAction::PromptSubmit
        | AppAction::Confirm(_)
        | AppAction::DismissOverlay => dialogs::handle_dialog_action(app, action),

        AppAction::OpenModelPicker
        | AppAction::PickerMove { .. }
        | AppAction::PickerSelect
        | AppAction::ModelsLoaded { .. }
        | AppAction::ModelsLoadFailed { .. } => picker::handle_picker_action(app, action),
    }
}
