use tokio::task::JoinHandle;

use super::ExecutorContext;
use crate::core::app::AppAction;
use crate::core::dispatch::{run_request, Collaborators, RequestParams};

/// Run one chat or image request in the background. A cancelled request
/// reports nothing.
pub fn spawn_request(
    params: RequestParams,
    collaborators: Collaborators,
    ctx: ExecutorContext,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        if let Some(outcome) = run_request(params, &collaborators).await {
            ctx.dispatcher
                .dispatch(AppAction::RequestCompleted(outcome), ctx.action_context);
        }
    })
}
