use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://jules.googleapis.com";
pub const DEFAULT_API_VERSION: &str = "v1alpha";
pub const DEFAULT_SESSION_TITLE: &str = "Test Application";

/// Client configuration as stored in `config.toml`.
///
/// Every field is optional on disk; missing fields fall back to the defaults.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_version: String,
    pub poll_interval_secs: u64,
    pub page_size: Option<u32>,
    pub max_pages_per_cycle: usize,
    pub session_title: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            poll_interval_secs: 5,
            page_size: Some(50),
            max_pages_per_cycle: 20,
            session_title: DEFAULT_SESSION_TITLE.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str("poll_interval_secs = 2").unwrap();
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.session_title, DEFAULT_SESSION_TITLE);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = ClientConfig {
            poll_interval_secs: 0,
            ..ClientConfig::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }
}
