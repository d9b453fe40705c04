//! Settings management for the `set` and `unset` subcommands.
//!
//! Each configuration key has a [`SettingHandler`]. Handlers validate their
//! input, write through the [`ConfigStore`], and describe the stored value
//! for the `chatlpt set` listing.

pub mod error;
pub mod handlers;
pub mod helpers;
pub mod registry;

pub use error::SettingError;
pub use registry::SettingRegistry;

use crate::core::config::{Config, ConfigStore};

/// Context provided to setting handlers during set/unset operations.
pub struct SetContext<'a> {
    pub store: &'a mut ConfigStore,
}

pub trait SettingHandler: Send + Sync {
    /// The configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Store a new value from the words after the key.
    ///
    /// Returns the success message to print.
    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// Restore the default value.
    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError>;

    /// One line describing the stored value.
    fn format(&self, config: &Config) -> String;
}
