//! Boolean setting handlers for on/off settings.

use crate::cli::settings::error::SettingError;
use crate::cli::settings::helpers::{
    format_bool, mutate_config_with_message, parse_bool, success_set, success_unset,
};
use crate::cli::settings::{SetContext, SettingHandler};
use crate::core::config::Config;

/// Data-driven handler for boolean (on/off) settings.
pub struct BooleanHandler {
    key: &'static str,
    hint: &'static str,
    example: &'static str,
    default: bool,
    get: fn(&Config) -> bool,
    set_field: fn(&mut Config, bool),
}

impl SettingHandler for BooleanHandler {
    fn key(&self) -> &'static str {
        self.key
    }

    fn set(&self, args: &[String], ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        if args.is_empty() {
            return Err(SettingError::MissingArgs {
                hint: self.hint,
                example: self.example,
            });
        }

        let input = args.join(" ");
        let value = parse_bool(&input).ok_or(SettingError::InvalidBoolean(input))?;
        let set_field = self.set_field;

        mutate_config_with_message(
            ctx,
            move |config| set_field(config, value),
            success_set(self.key, format_bool(value)),
        )
    }

    fn unset(&self, ctx: &mut SetContext<'_>) -> Result<String, SettingError> {
        let set_field = self.set_field;
        let default = self.default;

        mutate_config_with_message(
            ctx,
            move |config| set_field(config, default),
            success_unset(self.key, format_bool(default)),
        )
    }

    fn format(&self, config: &Config) -> String {
        format!("  {}: {}", self.key, format_bool((self.get)(config)))
    }
}

/// Handler for the `default-scaling` setting.
pub fn default_scaling_handler() -> BooleanHandler {
    BooleanHandler {
        key: "default-scaling",
        hint: "To choose between default and custom font scaling, specify on or off:",
        example: "chatlpt set default-scaling off",
        default: Config::default().use_default_scaling,
        get: |c| c.use_default_scaling,
        set_field: |c, v| c.use_default_scaling = v,
    }
}
