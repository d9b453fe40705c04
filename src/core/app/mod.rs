//! Application state shared by the event loop and the renderer.

pub mod actions;
mod overlays;

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::DynamicImage;

use crate::core::config::{Config, ConfigStore};
use crate::core::message::DEFAULT_SYSTEM_PROMPT;
use crate::core::session::{RequestId, Session, SessionId};

pub use actions::{
    apply_action, apply_actions, AppAction, AppActionContext, AppActionDispatcher,
    AppActionEnvelope, AppCommand, ConfirmAnswer, EditOp,
};
pub use overlays::{ConfirmKind, Confirmation, ModelPicker, Notice, PromptKind, TextPrompt};

pub const DEFAULT_TAB_TITLE: &str = "Chat";
pub const POPUP_DURATION: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub enum UiMode {
    Terminal,
    Prompt(TextPrompt),
    Confirm(Confirmation),
    Notice(Notice),
    ModelPicker(ModelPicker),
    Help,
}

/// A generated image shown over the terminal until it expires.
pub struct ImagePopup {
    pub image: DynamicImage,
    pub shown_at: Instant,
}

impl ImagePopup {
    pub fn new(image: DynamicImage) -> Self {
        Self {
            image,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= POPUP_DURATION
    }
}

pub struct App {
    pub sessions: Vec<Session>,
    pub active: usize,
    pub config: ConfigStore,
    pub mode: UiMode,
    pub status: Option<String>,
    pub popup: Option<ImagePopup>,
    pub exit_requested: bool,
    next_session_id: SessionId,
    next_request_id: RequestId,
}

impl App {
    /// Start with a single empty tab.
    pub fn new(config: ConfigStore) -> Self {
        let mut app = Self::empty(config);
        app.open_session(DEFAULT_TAB_TITLE);
        app
    }

    /// No tabs yet; callers must open at least one before drawing.
    pub fn empty(config: ConfigStore) -> Self {
        Self {
            sessions: Vec::new(),
            active: 0,
            config,
            mode: UiMode::Terminal,
            status: None,
            popup: None,
            exit_requested: false,
            next_session_id: 1,
            next_request_id: 1,
        }
    }

    /// Open a tab with a fresh conversation, make it active, and return it.
    pub fn open_session(&mut self, title: impl Into<String>) -> &mut Session {
        let id = self.next_session_id;
        self.next_session_id += 1;
        let session = Session::open(id, title, DEFAULT_SYSTEM_PROMPT, self.config.snapshot());
        tracing::debug!(session = id, "opened tab");
        self.sessions.push(session);
        self.active = self.sessions.len() - 1;
        &mut self.sessions[self.active]
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.get(self.active)
    }

    pub fn active_session_mut(&mut self) -> Option<&mut Session> {
        self.sessions.get_mut(self.active)
    }

    pub fn session_mut(&mut self, id: SessionId) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|session| session.id == id)
    }

    pub fn next_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn select_tab(&mut self, index: usize) {
        if index < self.sessions.len() {
            self.active = index;
        }
    }

    /// Move the active tab by `delta`, wrapping around.
    pub fn cycle_tab(&mut self, delta: isize) {
        let count = self.sessions.len() as isize;
        if count == 0 {
            return;
        }
        self.active = (self.active as isize + delta).rem_euclid(count) as usize;
    }

    /// Close the active tab, cancelling its request. Closing the last tab
    /// exits the app.
    pub fn close_active_tab(&mut self) {
        if self.active >= self.sessions.len() {
            return;
        }
        let mut session = self.sessions.remove(self.active);
        session.cancel_pending();
        tracing::debug!(session = session.id, "closed tab");

        if self.sessions.is_empty() {
            self.exit_requested = true;
            return;
        }
        self.active = self.active.min(self.sessions.len() - 1);
    }

    /// Give every open tab the latest configuration snapshot.
    pub fn publish_config(&mut self, snapshot: Arc<Config>) {
        for session in &mut self.sessions {
            session.set_config(Arc::clone(&snapshot));
        }
    }

    pub fn cancel_all_requests(&mut self) {
        for session in &mut self.sessions {
            session.cancel_pending();
        }
    }

    pub fn request_exit(&mut self) {
        self.cancel_all_requests();
        self.exit_requested = true;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn show_notice(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.mode = UiMode::Notice(Notice {
            title: title.into(),
            message: message.into(),
        });
    }

    pub fn show_popup(&mut self, image: DynamicImage) {
        self.popup = Some(ImagePopup::new(image));
    }

    /// Drop the popup once its display time is up. Returns whether it changed.
    pub fn expire_popup(&mut self, now: Instant) -> bool {
        if self.popup.as_ref().is_some_and(|popup| popup.is_expired(now)) {
            self.popup = None;
            return true;
        }
        false
    }
}
