use std::sync::Arc;

use tokio::task::JoinHandle;

use super::ExecutorContext;
use crate::api::models::chat_model_ids;
use crate::api::ModelLister;
use crate::core::app::AppAction;

pub fn spawn_model_loader(
    api_key: String,
    lister: Arc<dyn ModelLister>,
    ctx: ExecutorContext,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let action = match lister.list_models(&api_key).await {
            Ok(models) => AppAction::ModelsLoaded {
                models: chat_model_ids(models),
            },
            Err(err) => {
                tracing::warn!(error = %err, "model listing failed");
                AppAction::ModelsLoadFailed {
                    error: err.to_string(),
                }
            }
        };
        ctx.dispatcher.dispatch(action, ctx.action_context);
    })
}
