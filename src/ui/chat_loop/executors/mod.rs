//! Background work started on behalf of the event loop.
//!
//! Executors own snapshots of what they need and report back only through the
//! [`AppActionDispatcher`]; they never touch application state directly.

use crate::core::app::{AppActionContext, AppActionDispatcher};

pub mod model_loader;
pub mod request;

#[derive(Clone)]
pub struct ExecutorContext {
    pub dispatcher: AppActionDispatcher,
    pub action_context: AppActionContext,
}

impl ExecutorContext {
    pub fn new(dispatcher: AppActionDispatcher, action_context: AppActionContext) -> Self {
        Self {
            dispatcher,
            action_context,
        }
    }
}
