//! Turning a committed line into an outbound request and running it.
//!
//! [`begin_request`] runs on the UI task: it renders the placeholder and
//! marks the session pending before any work is spawned. [`run_request`] is
//! the worker body; it owns snapshots of everything it needs and reports a
//! tagged result that is only turned into display text by the renderer.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use tokio_util::sync::CancellationToken;

use crate::api::{
    ChatCompleter, ImageGenerator, ImageSource, ModelLister, ProviderError, IMAGE_SIZE,
};
use crate::core::ascii_art::{render_ascii, DEFAULT_COLUMNS};
use crate::core::command::{Command, CommandKind};
use crate::core::config::{Config, ImageDisplayMode};
use crate::core::message::Turn;
use crate::core::session::{RequestId, Session, SessionId};

pub const CHAT_TEMPERATURE: f32 = 0.8;
pub const IMAGE_COUNT: u32 = 1;
pub const MISSING_API_KEY_MESSAGE: &str =
    "API key is not provided. Set it with `chatlpt set api-key <KEY>` or OPENAI_API_KEY.";

/// The remote services a worker may call.
#[derive(Clone)]
pub struct Collaborators {
    pub chat: Arc<dyn ChatCompleter>,
    pub images: Arc<dyn ImageGenerator>,
    pub models: Arc<dyn ModelLister>,
}

impl Collaborators {
    /// Use one client for every collaborator.
    pub fn shared<C>(client: C) -> Self
    where
        C: ChatCompleter + ImageGenerator + ModelLister + 'static,
    {
        let client = Arc::new(client);
        Self {
            chat: client.clone(),
            images: client.clone(),
            models: client,
        }
    }
}

/// Everything a worker needs, detached from the live session.
#[derive(Debug, Clone)]
pub struct RequestParams {
    pub session_id: SessionId,
    pub request_id: RequestId,
    pub command: Command,
    pub turns: Vec<Turn>,
    pub config: Arc<Config>,
    pub cancel: CancellationToken,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestFailure {
    MissingApiKey,
    Provider(ProviderError),
    Image(String),
}

impl fmt::Display for RequestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestFailure::MissingApiKey => f.write_str(MISSING_API_KEY_MESSAGE),
            RequestFailure::Provider(err) => write!(f, "{err}"),
            RequestFailure::Image(message) => f.write_str(message),
        }
    }
}

impl StdError for RequestFailure {}

impl From<ProviderError> for RequestFailure {
    fn from(err: ProviderError) -> Self {
        RequestFailure::Provider(err)
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    AsciiImage(String),
    PopupImage { prompt: String, image: DynamicImage },
}

#[derive(Debug, Clone)]
pub struct RequestOutcome {
    pub session_id: SessionId,
    pub request_id: RequestId,
    pub kind: CommandKind,
    pub result: Result<Reply, RequestFailure>,
}

/// Classify `line`, show its placeholder and mark the session pending.
///
/// `line` must already be recorded as the session's latest user turn; the
/// returned params carry a transcript snapshot that includes it.
pub fn begin_request(session: &mut Session, request_id: RequestId, line: &str) -> RequestParams {
    let command = Command::parse(line);
    let kind = command.kind();

    session.buffer.push_placeholder(kind.placeholder());
    session.viewport.follow_tail();
    let cancel = session.mark_pending(request_id, kind);
    tracing::debug!(session = session.id, request = request_id, ?kind, "placeholder rendered");

    RequestParams {
        session_id: session.id,
        request_id,
        command,
        turns: session.transcript.turns().to_vec(),
        config: Arc::clone(session.config()),
        cancel,
    }
}

/// Worker body. Returns `None` if the request was cancelled first.
pub async fn run_request(
    params: RequestParams,
    collaborators: &Collaborators,
) -> Option<RequestOutcome> {
    let RequestParams {
        session_id,
        request_id,
        command,
        turns,
        config,
        cancel,
    } = params;
    let kind = command.kind();

    let result = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!(session = session_id, request = request_id, "request cancelled");
            return None;
        }
        result = execute(command, &turns, &config, collaborators) => result,
    };

    if let Err(err) = &result {
        tracing::warn!(session = session_id, request = request_id, error = %err, "request failed");
    } else {
        tracing::debug!(session = session_id, request = request_id, "request completed");
    }

    Some(RequestOutcome {
        session_id,
        request_id,
        kind,
        result,
    })
}

async fn execute(
    command: Command,
    turns: &[Turn],
    config: &Config,
    collaborators: &Collaborators,
) -> Result<Reply, RequestFailure> {
    let api_key = config.api_key().ok_or(RequestFailure::MissingApiKey)?;

    match command {
        Command::Chat { .. } => {
            let reply = collaborators
                .chat
                .complete(api_key, &config.current_model, turns, CHAT_TEMPERATURE)
                .await?;
            Ok(Reply::Text(reply.trim().to_string()))
        }
        Command::Image { prompt } => {
            let source = collaborators
                .images
                .generate(api_key, &prompt, IMAGE_COUNT, IMAGE_SIZE)
                .await?;
            let bytes = match source {
                ImageSource::Url(url) => collaborators.images.fetch(&url).await?,
                ImageSource::Inline(bytes) => bytes,
            };
            let image = image::load_from_memory(&bytes)
                .map_err(|err| RequestFailure::Image(format!("Could not decode image: {err}")))?;

            Ok(match config.image_display_mode {
                ImageDisplayMode::Inline => {
                    Reply::AsciiImage(render_ascii(&image, DEFAULT_COLUMNS))
                }
                ImageDisplayMode::Crt => Reply::PopupImage { prompt, image },
            })
        }
    }
}
