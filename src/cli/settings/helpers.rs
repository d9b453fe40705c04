//! Helper functions for settings operations.

use crate::core::config::Config;

use super::error::SettingError;
use super::SetContext;

/// Apply `f` through the store and return `message` once it is on disk.
pub fn mutate_config_with_message<F>(
    ctx: &mut SetContext<'_>,
    f: F,
    message: String,
) -> Result<String, SettingError>
where
    F: FnOnce(&mut Config),
{
    ctx.store
        .mutate(f)
        .map_err(|e| SettingError::ConfigError(e.to_string()))?;
    Ok(message)
}

/// Parse a boolean value from user input.
///
/// Accepts: on/off, true/false, yes/no (case-insensitive).
pub fn parse_bool(input: &str) -> Option<bool> {
    match input.to_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Some(true),
        "off" | "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

pub fn format_bool(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

pub fn success_set(key: &str, value: &str) -> String {
    format!("✅ Set {key} to: {value}")
}

pub fn success_unset(key: &str, default: &str) -> String {
    format!("✅ Unset {key} (will use default: {default})")
}

/// Show only the tail of a secret.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(8))
}
