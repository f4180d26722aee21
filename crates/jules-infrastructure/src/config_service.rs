//! Loads the client configuration.
//!
//! Precedence: environment > `config.toml` > built-in defaults. CLI flags are
//! applied on top by the binary.

use anyhow::{Context, Result};
use jules_core::ClientConfig;
use std::env;
use tracing::debug;

use crate::paths::JulesPaths;
use crate::storage::AtomicTomlFile;

pub const API_KEY_ENV: &str = "JULES_API_KEY";
pub const BASE_URL_ENV: &str = "JULES_BASE_URL";

pub struct ConfigService {
    file: AtomicTomlFile<ClientConfig>,
}

impl ConfigService {
    pub fn new(paths: &JulesPaths) -> Self {
        Self {
            file: AtomicTomlFile::new(paths.config_file()),
        }
    }

    /// Loads `config.toml` (or defaults) and applies environment overrides.
    pub fn load(&self) -> Result<ClientConfig> {
        let mut config = self
            .file
            .load()
            .with_context(|| format!("Failed to load {}", self.file.path().display()))?
            .unwrap_or_default();

        if let Some(base_url) = non_empty_env(BASE_URL_ENV) {
            debug!(%base_url, "base URL overridden from environment");
            config.base_url = base_url;
        }

        Ok(config)
    }

    /// Writes the configuration back, e.g. to materialize defaults.
    pub fn save(&self, config: &ClientConfig) -> Result<()> {
        self.file
            .save(config)
            .with_context(|| format!("Failed to save {}", self.file.path().display()))
    }
}

/// API key from the environment, if set and not blank.
pub fn api_key_from_env() -> Option<String> {
    non_empty_env(API_KEY_ENV)
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
