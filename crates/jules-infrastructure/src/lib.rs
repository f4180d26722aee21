pub mod config_service;
pub mod paths;
pub mod settings_service;
pub mod storage;

pub use crate::config_service::{ConfigService, api_key_from_env};
pub use crate::paths::JulesPaths;
pub use crate::settings_service::TomlSettingsRepository;
