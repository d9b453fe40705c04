//! One terminal tab: its surface, its conversation, and its in-flight request.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::core::buffer::SessionBuffer;
use crate::core::command::CommandKind;
use crate::core::config::Config;
use crate::core::message::Turn;
use crate::core::transcript::Transcript;

pub type SessionId = u64;
pub type RequestId = u64;

/// Returned when a session is asked to change while a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionBusy;

impl fmt::Display for SessionBusy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Request in progress; wait for the response.")
    }
}

impl StdError for SessionBusy {}

#[derive(Debug)]
pub struct PendingRequest {
    pub id: RequestId,
    pub kind: CommandKind,
    cancel: CancellationToken,
}

impl PendingRequest {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

/// Scroll state measured in wrapped lines up from the bottom of the surface.
///
/// An offset of zero follows the tail.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub offset_from_bottom: usize,
}

impl Viewport {
    pub fn follow_tail(&mut self) {
        self.offset_from_bottom = 0;
    }

    pub fn is_following_tail(&self) -> bool {
        self.offset_from_bottom == 0
    }

    pub fn scroll_by(&mut self, lines: i64) {
        // Positive values scroll toward older output.
        self.offset_from_bottom = if lines >= 0 {
            self.offset_from_bottom.saturating_add(lines as usize)
        } else {
            self.offset_from_bottom
                .saturating_sub(lines.unsigned_abs() as usize)
        };
    }

    pub fn clamp(&mut self, max_offset: usize) {
        self.offset_from_bottom = self.offset_from_bottom.min(max_offset);
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub title: String,
    pub buffer: SessionBuffer,
    pub transcript: Transcript,
    pub viewport: Viewport,
    config: Arc<Config>,
    pending: Option<PendingRequest>,
}

impl Session {
    /// A fresh tab: the transcript holds only `system_prompt` and the surface
    /// shows an empty prompt.
    pub fn open(
        id: SessionId,
        title: impl Into<String>,
        system_prompt: &str,
        config: Arc<Config>,
    ) -> Self {
        let mut buffer = SessionBuffer::new();
        buffer.open_prompt();
        Self {
            id,
            title: title.into(),
            buffer,
            transcript: Transcript::new(system_prompt),
            viewport: Viewport::default(),
            config,
            pending: None,
        }
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn set_config(&mut self, config: Arc<Config>) {
        self.config = config;
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the typed command line and record it as a user turn.
    ///
    /// `Ok(None)` means the line was blank and nothing changed.
    pub fn commit_line(&mut self) -> Result<Option<String>, SessionBusy> {
        if self.pending.is_some() {
            return Err(SessionBusy);
        }
        let Some(line) = self.buffer.commit() else {
            return Ok(None);
        };
        self.transcript.push_user(line.clone());
        self.viewport.follow_tail();
        Ok(Some(line))
    }

    /// Record an outstanding request and hand back the token that cancels it.
    pub fn mark_pending(&mut self, id: RequestId, kind: CommandKind) -> CancellationToken {
        if let Some(previous) = self.pending.take() {
            tracing::warn!(session = self.id, request = previous.id, "replacing pending request");
            previous.cancel();
        }
        let cancel = CancellationToken::new();
        self.pending = Some(PendingRequest {
            id,
            kind,
            cancel: cancel.clone(),
        });
        cancel
    }

    /// Clear the pending request if it is `id`. Anything else is stale.
    pub fn finish_pending(&mut self, id: RequestId) -> Option<PendingRequest> {
        match &self.pending {
            Some(pending) if pending.id == id => self.pending.take(),
            _ => None,
        }
    }

    pub fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            tracing::debug!(session = self.id, request = pending.id, "cancelling request");
            pending.cancel();
        }
    }

    /// Replace the conversation with `turns` and redraw the surface from it.
    pub fn restore_from_transcript(&mut self, turns: Vec<Turn>) {
        self.cancel_pending();
        let system_prompt = self.transcript.system_prompt().to_string();
        self.transcript = Transcript::from_turns(turns, &system_prompt);

        self.buffer.clear();
        for turn in self.transcript.turns() {
            self.buffer.append_output(&turn.display_line());
            self.buffer.append_output("\n");
        }
        self.buffer.open_prompt();
        self.viewport.follow_tail();
    }

    /// Drop the conversation back to its system turn and blank the surface.
    pub fn clear(&mut self) -> Result<(), SessionBusy> {
        if self.pending.is_some() {
            return Err(SessionBusy);
        }
        let system_prompt = self.transcript.system_prompt().to_string();
        self.transcript = Transcript::new(system_prompt);
        self.buffer.clear();
        self.buffer.open_prompt();
        self.viewport.follow_tail();
        Ok(())
    }
}
