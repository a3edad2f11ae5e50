//! Speech engine abstraction
//!
//! Backends (espeak-ng, platform engines, test fakes) implement [`SpeechEngine`].
//! One instance drives one utterance: acquire, configure, speak, stop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Voice gender, when the engine reports one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A synthetic voice offered by an engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    /// Identifier passed back to the engine when selecting this voice
    pub id: String,
    /// Human-readable name, used for persona matching
    pub name: String,
    pub language: String,
    /// `None` when the engine does not tag its voices
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
}

/// Where in the engine lifecycle a failure happened
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// No engine could be acquired (missing binary, driver not loaded)
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// Voice enumeration failed
    #[error("failed to list voices: {0}")]
    Voices(String),

    /// Voice, rate or volume could not be applied
    #[error("failed to configure engine: {0}")]
    Configure(String),

    /// Rendering or audio output failed
    #[error("playback failed: {0}")]
    Playback(String),

    /// The engine could not be stopped or released
    #[error("failed to release engine: {0}")]
    Release(String),
}

/// Trait that speech synthesis backends implement
///
/// Instances are not assumed re-entrant and are never shared between calls.
pub trait SpeechEngine: Send {
    /// Voices installed for this engine
    fn voices(&mut self) -> Result<Vec<Voice>, EngineError>;

    /// Switch to `voice` for subsequent utterances
    fn set_voice(&mut self, voice: &Voice) -> Result<(), EngineError>;

    /// Speaking rate in words per minute
    fn set_rate(&mut self, words_per_minute: u32) -> Result<(), EngineError>;

    /// Volume between 0.0 and 1.0
    fn set_volume(&mut self, volume: f32) -> Result<(), EngineError>;

    /// Render `text` and block until playback completes
    fn say_and_wait(&mut self, text: &str) -> Result<(), EngineError>;

    /// Stop output and release the engine
    fn stop(&mut self) -> Result<(), EngineError>;
}
