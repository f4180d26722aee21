//! User settings persisted between runs.
//!
//! Defines the settings model (API key, last-selected source) and the
//! interface for loading and saving it.

use serde::{Deserialize, Serialize};

/// Values the demo application remembers.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Resource name of the last source a session was created against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_source_name: Option<String>,
}

impl Settings {
    /// The API key, if one is set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Service for loading and saving [`Settings`].
///
/// # Security Note
///
/// Implementations should ensure that:
/// - The settings file is readable by the owner only (e.g., 600 on Unix)
/// - The API key is never logged or included in error messages
#[async_trait::async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Loads the settings. A missing file yields `Settings::default()`.
    async fn load(&self) -> Result<Settings, String>;

    /// Persists the settings, replacing the previous values.
    async fn save(&self, settings: &Settings) -> Result<(), String>;
}
