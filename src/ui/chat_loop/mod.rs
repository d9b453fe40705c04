//! Main chat event loop.
//!
//! The loop owns the [`App`] outright. Terminal events are resolved to
//! actions and applied in place; background work reports back through the
//! action channel and is applied on the next pass.

pub mod executors;
pub mod keybindings;
mod lifecycle;
mod setup;

use std::{
    error::Error,
    path::PathBuf,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use tokio::sync::mpsc;

use self::executors::{
    model_loader::spawn_model_loader, request::spawn_request, ExecutorContext,
};
use self::keybindings::{build_registry, KeyContext, KeyRegistry};
use self::lifecycle::{restore_terminal, setup_terminal};
use self::setup::bootstrap_app;
use crate::api::OpenAiClient;
use crate::core::app::{
    apply_action, apply_actions, App, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand, EditOp,
};
use crate::core::dispatch::Collaborators;
use crate::ui::renderer::ui;
use crate::utils::input::sanitize_text_input;

const MAX_FPS: u64 = 60;
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(10);
const IDLE_SLEEP: Duration = Duration::from_millis(16);

/// What the interactive session starts from.
#[derive(Debug, Clone)]
pub struct ChatOptions {
    pub config_path: PathBuf,
    pub model: Option<String>,
    pub files: Vec<PathBuf>,
}

/// Translate one terminal event into at most one command for the executors.
fn handle_terminal_event(
    app: &mut App,
    registry: &KeyRegistry,
    event: Event,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, registry, key, ctx),
        Event::Paste(text) => {
            if app.popup.is_some() {
                return None;
            }
            let text = sanitize_text_input(&text);
            apply_action(app, AppAction::Edit(EditOp::Insert(text)), ctx)
        }
        _ => None,
    }
}

fn handle_key(
    app: &mut App,
    registry: &KeyRegistry,
    key: KeyEvent,
    ctx: AppActionContext,
) -> Option<AppCommand> {
    // The popup swallows the key that dismisses it.
    if app.popup.is_some() {
        return apply_action(app, AppAction::DismissPopup, ctx);
    }
    let context = KeyContext::from_ui_mode(&app.mode);
    let action = registry.resolve(context, &key)?;
    apply_action(app, action, ctx)
}

fn execute_command(command: AppCommand, collaborators: &Collaborators, ctx: &ExecutorContext) {
    match command {
        AppCommand::SpawnRequest(params) => {
            spawn_request(params, collaborators.clone(), ctx.clone());
        }
        AppCommand::LoadModels { api_key } => {
            spawn_model_loader(api_key, collaborators.models.clone(), ctx.clone());
        }
    }
}

/// Apply everything the executors reported. Returns `None` when the queue
/// was empty.
fn drain_action_queue(
    app: &mut App,
    action_rx: &mut mpsc::UnboundedReceiver<AppActionEnvelope>,
) -> Option<Vec<AppCommand>> {
    let mut pending = Vec::new();
    while let Ok(envelope) = action_rx.try_recv() {
        pending.push(envelope);
    }
    if pending.is_empty() {
        return None;
    }
    Some(apply_actions(app, pending))
}

pub async fn run_chat(options: ChatOptions) -> Result<(), Box<dyn Error>> {
    let mut app = bootstrap_app(options.config_path, options.model, &options.files);
    let collaborators = Collaborators::shared(OpenAiClient::from_env());
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<AppActionEnvelope>();
    let dispatcher = AppActionDispatcher::new(action_tx);
    let registry = build_registry();

    let mut terminal = setup_terminal()?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();
    let event_reader_handle = tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(EVENT_POLL_INTERVAL) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });

    let frame_duration = Duration::from_millis(1000 / MAX_FPS);
    let mut last_draw = Instant::now() - frame_duration;
    let mut request_redraw = true;

    let result: Result<(), Box<dyn Error>> = 'main_loop: loop {
        if app.exit_requested {
            break 'main_loop Ok(());
        }

        let now = Instant::now();
        if request_redraw && now.duration_since(last_draw) >= frame_duration {
            if let Err(err) = terminal.draw(|f| ui(f, &mut app)) {
                break 'main_loop Err(err.into());
            }
            last_draw = now;
            request_redraw = false;
        }

        let size = terminal.size().unwrap_or_default();
        let ctx = AppActionContext {
            term_width: size.width,
            term_height: size.height,
        };
        let executor_ctx = ExecutorContext::new(dispatcher.clone(), ctx);

        let mut events_processed = false;
        while let Ok(ev) = event_rx.try_recv() {
            events_processed = true;
            if let Some(command) = handle_terminal_event(&mut app, &registry, ev, ctx) {
                execute_command(command, &collaborators, &executor_ctx);
            }
            if app.exit_requested {
                break;
            }
        }

        let commands = drain_action_queue(&mut app, &mut action_rx);
        let actions_applied = commands.is_some();
        for command in commands.into_iter().flatten() {
            execute_command(command, &collaborators, &executor_ctx);
        }

        let popup_expired = app.expire_popup(Instant::now());

        if events_processed || actions_applied || popup_expired {
            request_redraw = true;
        } else if !request_redraw {
            tokio::time::sleep(IDLE_SLEEP).await;
        }
    };

    event_reader_handle.abort();
    app.cancel_all_requests();
    restore_terminal(&mut terminal)?;

    if app.config.is_dirty() {
        if let Err(err) = app.config.persist() {
            tracing::error!(error = %err, "failed to save configuration");
            eprintln!("Failed to save configuration: {err}");
        }
    }

    result
}
