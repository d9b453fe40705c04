//! Diagnostic logging.
//!
//! The terminal belongs to the UI, so tracing output only goes anywhere when
//! a log file is given on the command line.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Build the filter from `RUST_LOG`, or [`DEFAULT_LOG_FILTER`] when unset or
/// unparsable.
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install the global subscriber writing to `log_file` (appending).
///
/// Without a log file nothing is installed and tracing macros are no-ops.
pub fn init(log_file: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let fmt_layer = fmt::layer().with_ansi(false).with_writer(Arc::new(file));

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .try_init()?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "logging started");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_log_file_installs_nothing() {
        assert!(init(None).is_ok());
    }

    #[test]
    fn scoped_subscriber_writes_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chatlpt.log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new("debug"))
            .with(fmt::layer().with_ansi(false).with_writer(Arc::new(file)));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!(session = 3, "placeholder rendered");
        });

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("placeholder rendered"));
        assert!(contents.contains("session=3"));
    }
}
