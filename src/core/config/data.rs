use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_FONT_FAMILY: &str = "Consolas";
pub const DEFAULT_FONT_SIZE: u32 = 16;
pub const MIN_FONT_SIZE: u32 = 8;

/// How `/image` results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageDisplayMode {
    /// Character art written into the terminal surface.
    #[default]
    Inline,
    /// A transient popup overlay; the transcript only records a notice.
    #[serde(alias = "popup")]
    Crt,
}

impl ImageDisplayMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageDisplayMode::Inline => "inline",
            ImageDisplayMode::Crt => "crt",
        }
    }

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(ImageDisplayMode::Inline),
            "crt" | "popup" => Some(ImageDisplayMode::Crt),
            _ => None,
        }
    }
}

impl fmt::Display for ImageDisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted user configuration.
///
/// Missing keys fall back to their defaults and unknown keys are ignored, so
/// files written by older or newer builds still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub current_model: String,
    pub font_family: String,
    pub custom_font_size: u32,
    pub use_default_scaling: bool,
    pub image_display_mode: ImageDisplayMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            current_model: DEFAULT_MODEL.to_string(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            custom_font_size: DEFAULT_FONT_SIZE,
            use_default_scaling: true,
            image_display_mode: ImageDisplayMode::Inline,
        }
    }
}

impl Config {
    /// Replace out-of-range values with defaults.
    pub fn normalized(mut self) -> Self {
        if self.custom_font_size < MIN_FONT_SIZE {
            tracing::warn!(
                size = self.custom_font_size,
                "custom_font_size below minimum; using default"
            );
            self.custom_font_size = DEFAULT_FONT_SIZE;
        }
        if self.current_model.trim().is_empty() {
            self.current_model = DEFAULT_MODEL.to_string();
        }
        self
    }

    /// The API key to send, if any. Blank keys count as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Get a user-friendly display string for a path, using `~` for the home
/// directory on Unix-like systems.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
