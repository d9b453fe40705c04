//! `.lpt` chat files: a pretty-printed JSON array of turns.

use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::config::data::path_display;
use crate::core::message::Turn;
use crate::utils::atomic::write_atomic;

pub const CHAT_FILE_EXTENSION: &str = "lpt";

#[derive(Debug)]
pub enum ChatFileError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for ChatFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatFileError::Read { path, source } => {
                write!(f, "Failed to open chat {}: {}", path_display(path), source)
            }
            ChatFileError::Parse { path, source } => {
                write!(f, "Failed to open chat {}: {}", path_display(path), source)
            }
            ChatFileError::Write { path, source } => {
                write!(f, "Failed to save chat {}: {}", path_display(path), source)
            }
        }
    }
}

impl StdError for ChatFileError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ChatFileError::Read { source, .. } => Some(source),
            ChatFileError::Parse { source, .. } => Some(source),
            ChatFileError::Write { source, .. } => Some(source),
        }
    }
}

pub fn save_chat(path: &Path, turns: &[Turn]) -> Result<(), ChatFileError> {
    let write_err = |source: std::io::Error| ChatFileError::Write {
        path: path.to_path_buf(),
        source,
    };
    let contents = serde_json::to_string_pretty(turns).map_err(|err| write_err(err.into()))?;
    write_atomic(path, contents.as_bytes()).map_err(write_err)?;
    tracing::debug!(path = %path.display(), turns = turns.len(), "saved chat");
    Ok(())
}

pub fn load_chat(path: &Path) -> Result<Vec<Turn>, ChatFileError> {
    let contents = fs::read_to_string(path).map_err(|source| ChatFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let turns: Vec<Turn> =
        serde_json::from_str(&contents).map_err(|source| ChatFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::debug!(path = %path.display(), turns = turns.len(), "loaded chat");
    Ok(turns)
}

/// Append `.lpt` to paths typed without any extension.
pub fn with_default_extension(path: impl Into<PathBuf>) -> PathBuf {
    let mut path = path.into();
    if path.extension().is_none() {
        path.set_extension(CHAT_FILE_EXTENSION);
    }
    path
}

/// Suggested file name for saving a tab.
pub fn default_file_name(tab_title: &str) -> String {
    format!("{tab_title}.{CHAT_FILE_EXTENSION}")
}

/// Tab title for a chat opened from `path`: the file name without its last
/// extension.
pub fn tab_title_for(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Chat".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::DEFAULT_SYSTEM_PROMPT;
    use tempfile::TempDir;

    fn sample_turns() -> Vec<Turn> {
        vec![
            Turn::system(DEFAULT_SYSTEM_PROMPT),
            Turn::user("hello"),
            Turn::assistant("Hi there!\nSecond line with \"quotes\" and ünïcödé"),
        ]
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.lpt");
        let turns = sample_turns();

        save_chat(&path, &turns).unwrap();
        assert_eq!(load_chat(&path).unwrap(), turns);
    }

    #[test]
    fn saved_file_is_indented_json_array_of_role_content_objects() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chat.lpt");
        save_chat(&path, &[Turn::user("hi")]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[\n  {\n    \"role\": \"user\",\n    \"content\": \"hi\"\n  }\n]");
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.lpt");
        fs::write(&path, r#"[{"role": "robot", "content": "x"}]"#).unwrap();

        let err = load_chat(&path).unwrap_err();
        assert!(matches!(err, ChatFileError::Parse { .. }));
    }

    #[test]
    fn load_reports_missing_files() {
        let dir = TempDir::new().unwrap();
        let err = load_chat(&dir.path().join("missing.lpt")).unwrap_err();
        assert!(matches!(err, ChatFileError::Read { .. }));
        assert!(err.to_string().starts_with("Failed to open chat"));
    }

    #[test]
    fn default_extension_only_added_when_missing() {
        assert_eq!(with_default_extension("notes"), PathBuf::from("notes.lpt"));
        assert_eq!(with_default_extension("notes.json"), PathBuf::from("notes.json"));
    }

    #[test]
    fn tab_titles_drop_the_last_extension() {
        assert_eq!(tab_title_for(Path::new("/tmp/Project.chat.lpt")), "Project.chat");
        assert_eq!(tab_title_for(Path::new("plain")), "plain");
        assert_eq!(default_file_name("Chat"), "Chat.lpt");
    }
}
