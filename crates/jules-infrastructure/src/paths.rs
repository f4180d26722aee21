//! Unified path management for jules configuration files.
//!
//! ```text
//! ~/.config/jules/             # Config directory ($JULES_CONFIG_DIR overrides)
//! ├── config.toml              # Client configuration
//! ├── settings.toml            # API key + last-selected source (0600)
//! └── logs/                    # Application logs
//!     └── jules.log.YYYY-MM-DD
//! ```

use std::env;
use std::path::{Path, PathBuf};

pub const CONFIG_DIR_ENV: &str = "JULES_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolved locations of every file the SDK and demo touch.
#[derive(Debug, Clone)]
pub struct JulesPaths {
    config_dir: PathBuf,
}

impl JulesPaths {
    /// Resolves the config directory.
    ///
    /// Priority: explicit `base` > `$JULES_CONFIG_DIR` > `~/.config/jules`.
    pub fn new(base: Option<&Path>) -> Result<Self, PathError> {
        if let Some(base) = base {
            return Ok(Self::with_dir(base));
        }

        if let Some(dir) = env::var_os(CONFIG_DIR_ENV).filter(|dir| !dir.is_empty()) {
            return Ok(Self::with_dir(PathBuf::from(dir)));
        }

        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(Self::with_dir(home.join(".config").join("jules")))
    }

    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: dir.into(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// # Security Note
    ///
    /// Holds the API key; written with mode 600 on Unix.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.toml")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_base_wins() {
        let paths = JulesPaths::new(Some(Path::new("/tmp/jules-test"))).unwrap();
        assert_eq!(paths.config_dir(), Path::new("/tmp/jules-test"));
    }

    #[test]
    fn test_files_live_under_config_dir() {
        let paths = JulesPaths::with_dir("/tmp/jules-test");
        assert!(paths.config_file().ends_with("config.toml"));
        assert!(paths.settings_file().ends_with("settings.toml"));
        assert!(paths.logs_dir().ends_with("logs"));
        assert!(paths.settings_file().starts_with(paths.config_dir()));
    }
}
