//! Configuration module for the `rill` CLI host.
//!
//! Search order: current directory, then `$HOME/.config/rill/rill.toml`,
//! then the OS config directory. Every field is defaulted, so a missing
//! file is equivalent to [`Config::default`].

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RillError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "rill.toml";

fn default_prompt() -> String {
    "rill> ".to_string()
}

fn default_history_limit() -> usize {
    1000
}

/// Application configuration for the `rill` CLI host.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Disable ANSI color in logging and error snippets.
    #[serde(default)]
    pub no_color: bool,

    /// REPL prompt text.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Retained only as a configured value; the REPL's line-editing/history
    /// mechanics are out of scope, so this is loaded and validated but not
    /// acted on beyond that.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            no_color: false,
            prompt: default_prompt(),
            history_limit: default_history_limit(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory (`$HOME/.config/rill/rill.toml`)
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file()? {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RillError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| RillError::Config(format!("Failed to parse configuration: {e}")))
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RillError::Config(format!("Failed to serialize configuration: {e}")))?;

        std::fs::write(path, content)?;
        Ok(())
    }

    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("rill").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("rill").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.verbose);
        assert!(!config.no_color);
        assert_eq!(config.prompt, "rill> ");
        assert_eq!(config.history_limit, 1000);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test_config.toml");

        let original = Config {
            verbose: true,
            no_color: true,
            prompt: "> ".to_string(),
            history_limit: 50,
        };
        original.save_to_path(&config_path).unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert_eq!(original, loaded);
    }

    #[test]
    fn test_load_from_nonexistent_path() {
        let result = Config::load_from_path(Path::new("/nonexistent/path/rill.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_partial_config_fills_in_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");
        std::fs::write(&config_path, "verbose = true\n").unwrap();

        let loaded = Config::load_from_path(&config_path).unwrap();
        assert!(loaded.verbose);
        assert_eq!(loaded.prompt, "rill> ");
        assert_eq!(loaded.history_limit, 1000);
    }
}
