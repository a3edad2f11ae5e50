//! Configuration management for limma
//!
//! Implements a layered configuration:
//! 1. Config file (`<config dir>/limma/config.json`)
//! 2. `.env` file in the working directory
//! 3. Environment variables (highest priority)

pub mod settings;

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use self::settings::{ProviderConfig, ProviderType, SpeechSettings, DEFAULT_MODEL};
use crate::error::{LimmaError, Result};

/// Environment variable overriding the API key
pub const API_KEY_ENV: &str = "LIMMA_API_KEY";
/// Fallback environment variable for the API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the model identifier
pub const MODEL_ENV: &str = "LIMMA_MODEL";
/// Environment variable overriding the endpoint
pub const BASE_URL_ENV: &str = "LIMMA_BASE_URL";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// LLM provider settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Default speech parameters used by the CLI
    #[serde(default)]
    pub speech: SpeechSettings,
}

impl Config {
    /// Load configuration from the config file, `.env` and the environment
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = Self::load_from_path(&Self::config_path())?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a specific path, falling back to defaults when absent
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| LimmaError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        serde_json::from_str(&contents).map_err(|e| LimmaError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay environment overrides using `lookup` to read variables
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV).or_else(|| non_empty(GEMINI_API_KEY_ENV)) {
            self.provider.api_key = key;
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.provider.model = model;
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.provider.base_url = Some(url);
        }
    }

    /// Get the configuration directory path
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("limma")
    }

    /// Get the config file path
    #[must_use]
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Save configuration to the default path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_path())
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_config_path() {
        assert!(Config::config_path().ends_with("limma/config.json"));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_from_path(&temp_dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.provider.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.provider.api_key = "secret".into();
        config.provider.base_url = Some("https://proxy.local/v1".into());
        config.speech.female = true;
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_path(&path).unwrap_err();
        assert!(matches!(err, LimmaError::ConfigParse { .. }));
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            (GEMINI_API_KEY_ENV, "from-gemini"),
            (MODEL_ENV, "gemini-1.5-pro"),
            (BASE_URL_ENV, "  "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| (*v).to_string()));

        assert_eq!(config.provider.api_key, "from-gemini");
        assert_eq!(config.provider.model, "gemini-1.5-pro");
        assert_eq!(config.provider.base_url, None);
    }

    #[test]
    fn test_limma_key_wins_over_gemini_key() {
        let mut config = Config::default();
        config.apply_env(|k| match k {
            API_KEY_ENV => Some("primary".into()),
            GEMINI_API_KEY_ENV => Some("fallback".into()),
            _ => None,
        });
        assert_eq!(config.provider.api_key, "primary");
    }
}
