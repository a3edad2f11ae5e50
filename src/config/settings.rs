//! Provider and speech settings

use serde::{Deserialize, Serialize};

use crate::error::{LimmaError, Result};

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Supported LLM providers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    #[default]
    Gemini,
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

/// Provider configuration, read by the adapter on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider type
    #[serde(default)]
    pub provider: ProviderType,

    /// API key for authentication
    #[serde(default)]
    pub api_key: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint override, used verbatim when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::default(),
            api_key: String::new(),
            model: default_model(),
            base_url: None,
        }
    }
}

impl ProviderConfig {
    /// Keys accepted by [`get`](Self::get) and [`set`](Self::set)
    pub const KEYS: [&'static str; 3] = ["api_key", "model", "base_url"];

    /// Create a configuration for `model` authenticated with `api_key`
    #[must_use]
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set the endpoint override
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// The endpoint override, if set and non-empty
    #[must_use]
    pub fn effective_base_url(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|url| !url.is_empty())
    }

    /// Look up a recognised key
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        match key {
            "api_key" => Ok(Some(self.api_key.clone())),
            "model" => Ok(Some(self.model.clone())),
            "base_url" => Ok(self.base_url.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a recognised key; an empty `base_url` clears the override
    ///
    /// # Errors
    ///
    /// Returns an error for unknown keys
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        match key {
            "api_key" => self.api_key = value,
            "model" => self.model = value,
            "base_url" => self.base_url = Some(value).filter(|v| !v.is_empty()),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Check required keys are present
    ///
    /// # Errors
    ///
    /// Returns an error if the API key or model is empty
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(LimmaError::MissingApiKey {
                provider: self.provider.to_string(),
            });
        }
        if self.model.trim().is_empty() {
            return Err(LimmaError::ConfigValidation(
                "model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> LimmaError {
    LimmaError::ConfigValidation(format!(
        "unknown key '{key}', expected one of: {}",
        ProviderConfig::KEYS.join(", ")
    ))
}

/// Default speech parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Prefer a female-sounding voice
    #[serde(default)]
    pub female: bool,

    /// Speaking rate in words per minute
    #[serde(default = "default_rate")]
    pub rate: i64,

    /// Volume between 0.0 and 1.0
    #[serde(default = "default_volume")]
    pub volume: f32,
}

fn default_rate() -> i64 {
    150
}

fn default_volume() -> f32 {
    0.9
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            female: false,
            rate: default_rate(),
            volume: default_volume(),
        }
    }
}
