//! Error types for limma

use std::path::PathBuf;

use thiserror::Error;

use crate::voice::EngineError;

/// Result type alias using [`LimmaError`]
pub type Result<T> = std::result::Result<T, LimmaError>;

/// Main error type for limma
#[derive(Debug, Error)]
pub enum LimmaError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse error
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    ConfigValidation(String),

    /// No credential configured for the provider
    #[error("Missing API key for provider: {provider}")]
    MissingApiKey { provider: String },

    /// Non-success HTTP status or a network fault (DNS, timeout, refused connection)
    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// Success status but the body does not have the expected vendor shape
    #[error("Unexpected response shape: {body}")]
    ResponseShape { body: String },

    /// Argument rejected before any engine work starts
    #[error("Invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    /// Speech engine failed somewhere in its lifecycle
    #[error("TTS engine failure: {0}")]
    Engine(#[from] EngineError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Transport error: HTTP {code}: {message}"),
        None => format!("Transport error: {message}"),
    }
}

impl LimmaError {
    /// Build a transport error from a reqwest failure that never produced a response
    pub(crate) fn network(err: &reqwest::Error) -> Self {
        Self::Transport {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Precondition failures for speech arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    #[error("{0} cannot be missing")]
    Missing(&'static str),

    #[error("{name} must be {expected}")]
    WrongType {
        name: &'static str,
        expected: &'static str,
    },

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{name} out of range: {detail}")]
    OutOfRange {
        name: &'static str,
        detail: String,
    },
}
