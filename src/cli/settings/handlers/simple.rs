//! Handlers for single-value settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{
    mask_secret, mutate_config_with_message, success_set, success_unset,
};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::data::{
    DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_MODEL, MIN_FONT_SIZE,
};
use crate::core::config::{Config, ImageDisplayMode};

/// Handler for the `api-key` setting.
pub struct ApiKeyHandler;

impl SettingHandler for ApiKeyHandler {
    fn key(&self) -> &'static str {
        "api-key"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let key = args.join("");
        let key = key.trim();
        if key.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To store an API key, provide the key:",
                example: "chatlpt set api-key sk-...",
            });
        }

        let message = success_set("api-key", &mask_secret(key));
        let key = key.to_string();
        mutate_config_with_message(ctx, move |config| config.api_key = Some(key), message)
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx,
            |config| config.api_key = None,
            "✅ Unset api-key".to_string(),
        )
    }

    fn format(&self, config: &Config) -> String {
        match config.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            Some(key) => format!("  api-key: {}", mask_secret(key)),
            None => "  api-key: (unset)".to_string(),
        }
    }
}

/// Handler for the `model` setting.
pub struct ModelHandler;

impl SettingHandler for ModelHandler {
    fn key(&self) -> &'static str {
        "model"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let model = args.join(" ").trim().to_string();
        if model.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the chat model, specify the model id:",
                example: "chatlpt set model gpt-4o",
            });
        }

        let message = success_set("model", &model);
        mutate_config_with_message(ctx, move |config| config.current_model = model, message)
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx,
            |config| config.current_model = DEFAULT_MODEL.to_string(),
            success_unset("model", DEFAULT_MODEL),
        )
    }

    fn format(&self, config: &Config) -> String {
        format!("  model: {}", config.current_model)
    }
}

/// Handler for the `font-family` setting.
pub struct FontFamilyHandler;

impl SettingHandler for FontFamilyHandler {
    fn key(&self) -> &'static str {
        "font-family"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let family = args.join(" ").trim().to_string();
        if family.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set the font family, provide its name:",
                example: "chatlpt set font-family \"Courier New\"",
            });
        }

        let message = success_set("font-family", &family);
        mutate_config_with_message(ctx, move |config| config.font_family = family, message)
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx,
            |config| config.font_family = DEFAULT_FONT_FAMILY.to_string(),
            success_unset("font-family", DEFAULT_FONT_FAMILY),
        )
    }

    fn format(&self, config: &Config) -> String {
        format!("  font-family: {}", config.font_family)
    }
}

/// Handler for the `font-size` setting.
pub struct FontSizeHandler;

impl SettingHandler for FontSizeHandler {
    fn key(&self) -> &'static str {
        "font-size"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To set a custom font size, specify it in points:",
                example: "chatlpt set font-size 18",
            });
        }

        let input = args.join(" ");
        let size = input
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|size| *size >= MIN_FONT_SIZE)
            .ok_or(SettingError::InvalidValue {
                key: "font-size",
                input: input.clone(),
                expected: "a whole number of points, at least 8",
            })?;

        mutate_config_with_message(
            ctx,
            move |config| config.custom_font_size = size,
            success_set("font-size", &size.to_string()),
        )
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        mutate_config_with_message(
            ctx,
            |config| config.custom_font_size = DEFAULT_FONT_SIZE,
            success_unset("font-size", &DEFAULT_FONT_SIZE.to_string()),
        )
    }

    fn format(&self, config: &Config) -> String {
        format!("  font-size: {}", config.custom_font_size)
    }
}

/// Handler for the `image-display` setting.
pub struct ImageDisplayHandler;

impl SettingHandler for ImageDisplayHandler {
    fn key(&self) -> &'static str {
        "image-display"
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: "To choose how /image results are shown, specify inline or crt:",
                example: "chatlpt set image-display crt",
            });
        }

        let input = args.join(" ");
        let mode = ImageDisplayMode::parse(&input).ok_or(SettingError::InvalidValue {
            key: "image-display",
            input: input.clone(),
            expected: "inline or crt",
        })?;

        mutate_config_with_message(
            ctx,
            move |config| config.image_display_mode = mode,
            success_set("image-display", mode.as_str()),
        )
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let default = ImageDisplayMode::default();
        mutate_config_with_message(
            ctx,
            move |config| config.image_display_mode = default,
            success_unset("image-display", default.as_str()),
        )
    }

    fn format(&self, config: &Config) -> String {
        format!("  image-display: {}", config.image_display_mode)
    }
}
