//! Settings persistence backed by `settings.toml`.
//!
//! Encryption at rest is not handled here; the file is written owner-only.

use async_trait::async_trait;
use jules_core::settings::{Settings, SettingsRepository};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::debug;

use crate::paths::JulesPaths;
use crate::storage::AtomicTomlFile;

/// [`SettingsRepository`] that caches the last loaded/saved value.
#[derive(Clone)]
pub struct TomlSettingsRepository {
    file: Arc<AtomicTomlFile<Settings>>,
    cached: Arc<RwLock<Option<Settings>>>,
}

impl TomlSettingsRepository {
    pub fn new(paths: &JulesPaths) -> Self {
        Self::with_path(paths.settings_file())
    }

    /// Creates a repository with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).private()),
            cached: Arc::new(RwLock::new(None)),
        }
    }

    fn cached(&self) -> Option<Settings> {
        self.cached.read().ok().and_then(|guard| guard.clone())
    }

    fn store_cache(&self, settings: &Settings) {
        if let Ok(mut guard) = self.cached.write() {
            *guard = Some(settings.clone());
        }
    }
}

#[async_trait]
impl SettingsRepository for TomlSettingsRepository {
    async fn load(&self) -> Result<Settings, String> {
        if let Some(settings) = self.cached() {
            return Ok(settings);
        }

        let loaded = self
            .file
            .load()
            .map_err(|e| {
                format!(
                    "Failed to load settings from {}: {}",
                    self.file.path().display(),
                    e
                )
            })?
            .unwrap_or_default();

        debug!(
            has_api_key = loaded.api_key().is_some(),
            selected_source = ?loaded.selected_source_name,
            "settings loaded"
        );
        self.store_cache(&loaded);
        Ok(loaded)
    }

    async fn save(&self, settings: &Settings) -> Result<(), String> {
        let next = settings.clone();
        self.file
            .update(Settings::default(), |current| {
                *current = next;
                Ok(())
            })
            .map_err(|e| {
                format!(
                    "Failed to save settings to {}: {}",
                    self.file.path().display(),
                    e
                )
            })?;

        self.store_cache(settings);
        Ok(())
    }
}
