//! Service layer for hosted LLM providers
//!
//! A [`Provider`] turns a conversation into a single reply string. Each call
//! issues exactly one request: no retries, no streaming, no history kept
//! between calls.

pub mod gemini;

use async_trait::async_trait;

use crate::{
    config::{ProviderConfig, ProviderType},
    error::Result,
    messages::Message,
};

pub use self::gemini::GeminiProvider;

/// Core trait for provider adapters
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider name (e.g., "gemini")
    fn provider(&self) -> &str;

    /// Get the model identifier
    fn model(&self) -> &str;

    /// Send the conversation and return the reply text
    async fn send(&self, messages: &[Message]) -> Result<String>;
}

/// Validate `config` and build the adapter for its provider
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or the HTTP client cannot be built
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn Provider>> {
    config.validate()?;

    match config.provider {
        ProviderType::Gemini => Ok(Box::new(GeminiProvider::new(config.clone())?)),
    }
}

/// Send a single user prompt and return the reply
///
/// # Errors
///
/// Propagates the provider's transport and response-shape errors
pub async fn generate(provider: &dyn Provider, prompt: &str) -> Result<String> {
    provider.send(&[Message::user(prompt)]).await
}
