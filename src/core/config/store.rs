use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::config::data::Config;
use crate::core::config::io::ConfigError;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Single owner of the persisted configuration.
///
/// Sessions never see the mutable [`Config`]; they receive immutable
/// snapshots that already fold in the environment API key fallback and any
/// per-run model override. Neither of those is ever written back to disk.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    persisted: Config,
    env_api_key: Option<String>,
    model_override: Option<String>,
    snapshot: Arc<Config>,
    dirty: bool,
    load_failed: bool,
}

impl ConfigStore {
    pub fn new(
        path: PathBuf,
        persisted: Config,
        env_api_key: Option<String>,
        model_override: Option<String>,
    ) -> Self {
        let snapshot = Arc::new(build_snapshot(
            &persisted,
            env_api_key.as_deref(),
            model_override.as_deref(),
        ));
        Self {
            path,
            persisted,
            env_api_key,
            model_override,
            snapshot,
            dirty: false,
            load_failed: false,
        }
    }

    /// Load from `path`. A broken file is reported alongside a store holding
    /// defaults, so the caller can show the problem and keep going. Such a
    /// store never writes back over the broken file.
    pub fn load(path: PathBuf, model_override: Option<String>) -> (Self, Option<ConfigError>) {
        let env_api_key = std::env::var(API_KEY_ENV).ok();
        match Config::load_from_path(&path) {
            Ok(config) => (Self::new(path, config, env_api_key, model_override), None),
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default configuration");
                let mut store = Self::new(path, Config::default(), env_api_key, model_override);
                store.load_failed = true;
                (store, Some(err))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn persisted(&self) -> &Config {
        &self.persisted
    }

    pub fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&self.snapshot)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the file on disk could not be loaded. Changes stay in memory.
    pub fn load_failed(&self) -> bool {
        self.load_failed
    }

    /// Switch the chat model and publish a new snapshot.
    pub fn set_model(&mut self, model: impl Into<String>) -> Arc<Config> {
        self.persisted.current_model = model.into();
        self.model_override = None;
        self.dirty = true;
        self.refresh()
    }

    /// Apply `mutator` to the persisted configuration and write it out
    /// immediately.
    pub fn mutate<F, T>(&mut self, mutator: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&mut Config) -> T,
    {
        self.ensure_writable()?;
        let mut working = self.persisted.clone();
        let result = mutator(&mut working);
        working.save_to_path(&self.path)?;
        self.persisted = working;
        self.dirty = false;
        self.refresh();
        Ok(result)
    }

    /// Write pending changes, if any.
    pub fn persist(&mut self) -> Result<(), ConfigError> {
        if !self.dirty {
            return Ok(());
        }
        self.ensure_writable()?;
        self.persisted.save_to_path(&self.path)?;
        self.dirty = false;
        Ok(())
    }

    fn ensure_writable(&self) -> Result<(), ConfigError> {
        if self.load_failed {
            return Err(ConfigError::LoadFailed {
                path: self.path.clone(),
            });
        }
        Ok(())
    }

    fn refresh(&mut self) -> Arc<Config> {
        self.snapshot = Arc::new(build_snapshot(
            &self.persisted,
            self.env_api_key.as_deref(),
            self.model_override.as_deref(),
        ));
        self.snapshot()
    }
}

fn build_snapshot(
    persisted: &Config,
    env_api_key: Option<&str>,
    model_override: Option<&str>,
) -> Config {
    let mut snapshot = persisted.clone();
    if snapshot.api_key().is_none() {
        snapshot.api_key = env_api_key
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);
    }
    if let Some(model) = model_override.filter(|model| !model.trim().is_empty()) {
        snapshot.current_model = model.to_string();
    }
    snapshot
}
