//! Command-line interface parsing and handling
//!
//! This module parses the command line and runs either the interactive chat
//! or one of the configuration subcommands.

pub mod settings;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::settings::{SetContext, SettingError, SettingRegistry};
use crate::core::config::data::path_display;
use crate::core::config::{Config, ConfigStore};
use crate::ui::chat_loop::{run_chat, ChatOptions};
use crate::utils::logging;

#[derive(Parser)]
#[command(name = "chatlpt")]
#[command(version)]
#[command(about = "A tabbed, terminal-styled chat client for OpenAI-compatible APIs")]
#[command(
    long_about = "ChatLPT is a full-screen terminal chat client with tabs. Each tab is a \
green-on-black surface where you type after the '> ' prompt and the reply is printed below.\n\n\
Configuration:\n\
  Use 'chatlpt set' to list settings and 'chatlpt set <key> <value>' to change them.\n\n\
Environment Variables:\n\
  OPENAI_API_KEY    API key used when none is configured\n\
  OPENAI_BASE_URL   Custom API base URL (optional, defaults to https://api.openai.com/v1)\n\
  RUST_LOG          Log filter for --log output (defaults to info)\n\n\
Commands typed in a tab:\n\
  <text>            Chat with the selected model\n\
  /image <prompt>   Generate an image\n\n\
Press F1 inside the app for the key bindings."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Use this configuration file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Model to use for this run without saving it
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat {
        /// Chat files to open, one tab each
        files: Vec<PathBuf>,
    },
    /// Set configuration values, or list them when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key (can be multiple words)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Restore a configuration value to its default
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    logging::init(args.log.as_deref())?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config_path = match args.config {
        Some(path) => path,
        None => Config::default_path()?,
    };

    match args.command.unwrap_or(Commands::Chat { files: Vec::new() }) {
        Commands::Chat { files } => {
            run_chat(ChatOptions {
                config_path,
                model: args.model,
                files,
            })
            .await
        }
        Commands::Set { key: None, .. } => {
            let store = open_store(config_path);
            print_settings(&store);
            Ok(())
        }
        Commands::Set {
            key: Some(key),
            value,
        } => {
            let mut store = open_store(config_path);
            exit_on_error(set_setting(&mut store, &key, &value));
            Ok(())
        }
        Commands::Unset { key } => {
            let mut store = open_store(config_path);
            exit_on_error(unset_setting(&mut store, &key));
            Ok(())
        }
    }
}

/// Load the store for a settings command. A broken file is reported and left
/// alone rather than overwritten with defaults.
fn open_store(path: PathBuf) -> ConfigStore {
    let (store, error) = ConfigStore::load(path, None);
    if let Some(err) = error {
        eprintln!("❌ {err}");
        std::process::exit(1);
    }
    store
}

fn exit_on_error(result: Result<String, SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

pub fn set_setting(
    store: &mut ConfigStore,
    key: &str,
    args: &[String],
) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.set(args, &mut SetContext { store })
}

pub fn unset_setting(store: &mut ConfigStore, key: &str) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    handler.unset(&mut SetContext { store })
}

pub fn settings_listing(store: &ConfigStore) -> Vec<String> {
    let registry = SettingRegistry::new();
    let config = store.persisted();
    registry
        .keys_display_order()
        .iter()
        .filter_map(|key| registry.get(key))
        .map(|handler| handler.format(config))
        .collect()
}

fn print_settings(store: &ConfigStore) {
    println!("chatlpt configuration ({}):", path_display(store.path()));
    for line in settings_listing(store) {
        println!("{line}");
    }
}
