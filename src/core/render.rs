//! Applying a finished request to its session.

use image::DynamicImage;

use crate::core::dispatch::{Reply, RequestOutcome};
use crate::core::session::Session;

/// Fold `outcome` into `session`.
///
/// Outcomes that do not match the session's pending request are dropped
/// without touching anything. On success the placeholder is replaced by the
/// reply (or the rendered error), the same text becomes the assistant turn,
/// and the prompt reopens. Popup-mode images are handed back for display.
pub fn render_outcome(session: &mut Session, outcome: RequestOutcome) -> Option<DynamicImage> {
    let Some(pending) = session.finish_pending(outcome.request_id) else {
        tracing::debug!(
            session = session.id,
            request = outcome.request_id,
            "dropping stale request outcome"
        );
        return None;
    };

    if !session.buffer.remove_placeholder(pending.kind.placeholder()) {
        tracing::warn!(session = session.id, "placeholder missing when rendering reply");
    }

    let mut popup = None;
    let text = match outcome.result {
        Ok(Reply::Text(text)) | Ok(Reply::AsciiImage(text)) => text,
        Ok(Reply::PopupImage { prompt, image }) => {
            popup = Some(image);
            format!("[Image generated in CRT Popup for: {prompt}]")
        }
        Err(failure) => format!("{}: {}", pending.kind.error_prefix(), failure),
    };

    session.buffer.append_output(&text);
    session.buffer.append_output("\n");
    session.transcript.push_assistant(text);
    session.buffer.open_prompt();
    session.viewport.follow_tail();
    popup
}
