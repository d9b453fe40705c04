//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop, key resolution, and background executors.
//! - [`renderer`] and [`layout`]: frame composition.
//! - [`image_popup`]: full-color image drawing for the CRT popup.
//!
//! This layer presents and captures interaction state; [`crate::core`] owns
//! the session and request logic.

pub mod chat_loop;
pub mod image_popup;
pub mod layout;
pub mod renderer;
