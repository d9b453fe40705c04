use std::path::{Path, PathBuf};

use crate::core::app::{App, DEFAULT_TAB_TITLE};
use crate::core::chat_file::{load_chat, tab_title_for};
use crate::core::config::ConfigStore;

/// Build the application state for the chat loop.
///
/// Configuration and chat file problems do not stop startup; they are
/// collected into one notice shown over the first frame.
pub fn bootstrap_app(
    config_path: PathBuf,
    model_override: Option<String>,
    files: &[PathBuf],
) -> App {
    let (store, config_error) = ConfigStore::load(config_path, model_override);
    let mut app = App::empty(store);
    let mut problems = Vec::new();

    if let Some(err) = config_error {
        problems.push(format!("Failed to load configuration: {err}"));
    }

    for path in files {
        if let Err(message) = open_chat_file(&mut app, path) {
            problems.push(message);
        }
    }

    if app.sessions.is_empty() {
        app.open_session(DEFAULT_TAB_TITLE);
    } else {
        app.select_tab(0);
    }

    if !problems.is_empty() {
        app.show_notice("Error", problems.join("\n"));
    }
    app
}

fn open_chat_file(app: &mut App, path: &Path) -> Result<(), String> {
    match load_chat(path) {
        Ok(turns) => {
            app.open_session(tab_title_for(path))
                .restore_from_transcript(turns);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(error = %err, "skipping chat file");
            Err(err.to_string())
        }
    }
}
