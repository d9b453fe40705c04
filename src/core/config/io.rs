use crate::core::config::data::{path_display, Config};
use crate::utils::atomic::write_atomic;
use directories::ProjectDirs;
use std::error::Error as StdError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "chatlpt_config.json";

/// Errors that can occur when loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not a valid configuration object.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Failed to write the configuration file.
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file on disk failed to load, so writing defaults over it would
    /// lose the user's settings.
    LoadFailed { path: PathBuf },

    /// No platform configuration directory could be determined.
    NoConfigDir,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(
                    f,
                    "Failed to read config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Parse { path, source } => {
                write!(
                    f,
                    "Failed to parse config at {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::Write { path, source } => {
                write!(
                    f,
                    "Failed to save config to {}: {}",
                    path_display(path),
                    source
                )
            }
            ConfigError::LoadFailed { path } => {
                write!(
                    f,
                    "Not overwriting config at {}: it failed to load",
                    path_display(path)
                )
            }
            ConfigError::NoConfigDir => {
                write!(f, "Could not determine a configuration directory")
            }
        }
    }
}

impl StdError for ConfigError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::Write { source, .. } => Some(source),
            ConfigError::LoadFailed { .. } | ConfigError::NoConfigDir => None,
        }
    }
}

impl Config {
    /// Load a configuration file, or defaults when it does not exist.
    pub fn load_from_path(config_path: &Path) -> Result<Config, ConfigError> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
        let config: Config =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.to_path_buf(),
                source,
            })?;
        Ok(config.normalized())
    }

    /// Write the configuration atomically as pretty-printed JSON.
    pub fn save_to_path(&self, config_path: &Path) -> Result<(), ConfigError> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: config_path.to_path_buf(),
            source,
        };

        let contents = serde_json::to_string_pretty(self).map_err(|err| write_err(err.into()))?;
        write_atomic(config_path, contents.as_bytes()).map_err(write_err)
    }

    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let proj_dirs =
            ProjectDirs::from("org", "chatlpt", "chatlpt").ok_or(ConfigError::NoConfigDir)?;
        Ok(proj_dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
