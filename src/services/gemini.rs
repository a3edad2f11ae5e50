//! Google Gemini `generateContent` adapter
//!
//! Message roles are not forwarded: every message becomes a single-part
//! content block carrying only its text.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    config::ProviderConfig,
    error::{LimmaError, Result},
    messages::Message,
};

use super::Provider;

/// Header carrying the credential
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_ENDPOINT_PREFIX: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// JSON pointer to the reply text in a success body
const REPLY_TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

/// Resolve the endpoint: the configured override verbatim, else the model URL template
#[must_use]
pub fn endpoint(config: &ProviderConfig) -> String {
    match config.effective_base_url() {
        Some(url) => url.to_string(),
        None => format!("{DEFAULT_ENDPOINT_PREFIX}{}:generateContent", config.model),
    }
}

/// Gemini API adapter
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
    endpoint: String,
}

impl GeminiProvider {
    /// Create a new Gemini adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is not a valid header value or the client cannot be built
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub(crate) fn with_timeout(config: ProviderConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers({
                let mut headers = header::HeaderMap::new();
                let mut key = header::HeaderValue::from_str(&config.api_key).map_err(|_| {
                    LimmaError::ConfigValidation("Invalid API key format".to_string())
                })?;
                key.set_sensitive(true);
                headers.insert(API_KEY_HEADER, key);
                headers
            })
            .timeout(timeout)
            .build()
            .map_err(|e| LimmaError::network(&e))?;

        let endpoint = endpoint(&config);

        Ok(Self {
            client,
            config,
            endpoint,
        })
    }

    /// Endpoint this adapter posts to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Convert internal messages to Gemini contents
    fn convert_messages(messages: &[Message]) -> GeminiRequest {
        GeminiRequest {
            contents: messages
                .iter()
                .map(|msg| GeminiContent {
                    parts: vec![GeminiPart {
                        text: msg.content.clone(),
                    }],
                })
                .collect(),
        }
    }
}

/// Pull the first candidate's first text part out of a decoded body
fn extract_reply(data: &Value) -> Option<&str> {
    data.pointer(REPLY_TEXT_POINTER).and_then(Value::as_str)
}

#[async_trait]
impl Provider for GeminiProvider {
    fn provider(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn send(&self, messages: &[Message]) -> Result<String> {
        let request = Self::convert_messages(messages);

        debug!(
            model = %self.config.model,
            endpoint = %self.endpoint,
            messages = messages.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| LimmaError::network(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LimmaError::network(&e))?;

        if !status.is_success() {
            return Err(LimmaError::Transport {
                status: Some(status.as_u16()),
                message: body,
            });
        }

        let Ok(data) = serde_json::from_str::<Value>(&body) else {
            return Err(LimmaError::ResponseShape { body });
        };

        match extract_reply(&data) {
            Some(text) => {
                debug!(status = status.as_u16(), chars = text.len(), "received reply");
                Ok(text.to_string())
            }
            None => Err(LimmaError::ResponseShape {
                body: data.to_string(),
            }),
        }
    }
}

// Gemini API types

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}
