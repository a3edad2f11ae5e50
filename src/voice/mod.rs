//! Speech output
//!
//! [`Speaker::speak`] validates its arguments, acquires a fresh engine, picks a
//! voice, applies rate and volume, and blocks until the utterance has played.
//! Calls are not serialised; running two at once on the same audio device is
//! left to the backend.

pub mod engine;
pub mod espeak;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub use self::{
    engine::{EngineError, Gender, SpeechEngine, Voice},
    espeak::EspeakEngine,
};
use crate::{
    config::SpeechSettings,
    error::{InvalidArgument, Result},
};

/// Case-insensitive name fragments that mark a female-sounding voice
pub const FEMALE_VOICE_HINTS: [&str; 6] =
    ["female", "woman", "zira", "samantha", "victoria", "anna"];

/// Speech parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpeakOptions {
    /// Prefer a female-sounding voice
    pub female: bool,
    /// Words per minute; must be positive
    pub rate: i64,
    /// Between 0.0 and 1.0 inclusive
    pub volume: f32,
}

impl Default for SpeakOptions {
    fn default() -> Self {
        Self {
            female: false,
            rate: 150,
            volume: 0.9,
        }
    }
}

impl From<SpeechSettings> for SpeakOptions {
    fn from(settings: SpeechSettings) -> Self {
        Self {
            female: settings.female,
            rate: settings.rate,
            volume: settings.volume,
        }
    }
}

/// Outcome of voice persona selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PersonaSelection {
    /// No particular voice was asked for
    NotRequested,
    /// A matching voice was found and selected
    Matched { voice: String },
    /// A female voice was asked for but none matched; the default voice was used
    DefaultVoice,
}

/// Result of a completed utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeechOutcome {
    pub persona: PersonaSelection,
}

/// A speech request decoded from loosely-typed input
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakRequest {
    pub text: String,
    pub options: SpeakOptions,
}

impl SpeakRequest {
    /// Decode and validate a JSON object `{"text", "female"?, "rate"?, "volume"?}`
    ///
    /// Checks run in order: text present, text is a string, text not blank,
    /// volume in range, rate a positive integer.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvalidArgument`] encountered; a payload that is not
    /// an object is a wrong type
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_value(value: &Value) -> std::result::Result<Self, InvalidArgument> {
        if !value.is_object() {
            return Err(InvalidArgument::WrongType {
                name: "request",
                expected: "a JSON object",
            });
        }

        let text = match value.get("text") {
            None | Some(Value::Null) => return Err(InvalidArgument::Missing("text")),
            Some(Value::String(text)) => text,
            Some(_) => {
                return Err(InvalidArgument::WrongType {
                    name: "text",
                    expected: "a string",
                })
            }
        };
        validate_text(text)?;

        let defaults = SpeakOptions::default();

        let volume = match value.get("volume") {
            None | Some(Value::Null) => defaults.volume,
            Some(v) => {
                let volume = v.as_f64().ok_or(InvalidArgument::WrongType {
                    name: "volume",
                    expected: "a number",
                })?;
                validate_volume(volume)?;
                volume as f32
            }
        };

        let rate = match value.get("rate") {
            None | Some(Value::Null) => defaults.rate,
            Some(v) => {
                let rate = v.as_i64().ok_or_else(|| rate_out_of_range(v))?;
                validate_rate(rate)?;
                rate
            }
        };

        let female = match value.get("female") {
            None | Some(Value::Null) => defaults.female,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                return Err(InvalidArgument::WrongType {
                    name: "female",
                    expected: "a boolean",
                })
            }
        };

        Ok(Self {
            text: text.clone(),
            options: SpeakOptions {
                female,
                rate,
                volume,
            },
        })
    }
}

fn validate_text(text: &str) -> std::result::Result<(), InvalidArgument> {
    if text.trim().is_empty() {
        return Err(InvalidArgument::Empty("text"));
    }
    Ok(())
}

fn validate_volume(volume: impl Into<f64>) -> std::result::Result<(), InvalidArgument> {
    let volume = volume.into();
    if !(0.0..=1.0).contains(&volume) {
        return Err(InvalidArgument::OutOfRange {
            name: "volume",
            detail: format!("{volume} is not between 0.0 and 1.0"),
        });
    }
    Ok(())
}

fn validate_rate(rate: i64) -> std::result::Result<u32, InvalidArgument> {
    u32::try_from(rate)
        .ok()
        .filter(|r| *r > 0)
        .ok_or_else(|| rate_out_of_range(rate))
}

fn rate_out_of_range(rate: impl std::fmt::Display) -> InvalidArgument {
    InvalidArgument::OutOfRange {
        name: "rate",
        detail: format!("{rate} is not a positive integer"),
    }
}

/// Validate `text` and `options`, returning the rate as words per minute
fn validate(text: &str, options: &SpeakOptions) -> std::result::Result<u32, InvalidArgument> {
    validate_text(text)?;
    validate_volume(options.volume)?;
    validate_rate(options.rate)
}

/// Pick a female-sounding voice
///
/// Voices the engine tags as female win. Otherwise the first untagged voice
/// whose name contains one of [`FEMALE_VOICE_HINTS`]; voices tagged male are
/// never matched by name.
#[must_use]
pub fn find_female_voice(voices: &[Voice]) -> Option<&Voice> {
    voices
        .iter()
        .find(|voice| voice.gender == Some(Gender::Female))
        .or_else(|| {
            voices.iter().filter(|voice| voice.gender.is_none()).find(|voice| {
                let name = voice.name.to_lowercase();
                FEMALE_VOICE_HINTS.iter().any(|hint| name.contains(hint))
            })
        })
}

type EngineFactory =
    Box<dyn Fn() -> std::result::Result<Box<dyn SpeechEngine>, EngineError> + Send + Sync>;

/// Speaks text through engines produced by a factory, one engine per call
pub struct Speaker {
    factory: EngineFactory,
}

impl Default for Speaker {
    fn default() -> Self {
        Self::espeak()
    }
}

impl Speaker {
    /// Create a speaker that acquires engines from `factory`
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> std::result::Result<Box<dyn SpeechEngine>, EngineError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
        }
    }

    /// Speaker backed by the espeak-ng binary
    #[must_use]
    pub fn espeak() -> Self {
        Self::new(|| Ok(Box::new(EspeakEngine::new()?) as Box<dyn SpeechEngine>))
    }

    /// Speak `text`, blocking until playback completes
    ///
    /// # Errors
    ///
    /// Returns [`InvalidArgument`](crate::LimmaError::InvalidArgument) before any
    /// engine work if an argument is rejected, or
    /// [`Engine`](crate::LimmaError::Engine) if the engine fails at any step
    pub fn speak(&self, text: &str, options: &SpeakOptions) -> Result<SpeechOutcome> {
        let rate = validate(text, options)?;
        let mut engine = (self.factory)()?;

        let result = drive(engine.as_mut(), text, options, rate);
        let stopped = engine.stop();

        let outcome = result?;
        stopped?;
        Ok(outcome)
    }

    /// Speak a decoded [`SpeakRequest`]
    ///
    /// # Errors
    ///
    /// See [`speak`](Self::speak)
    pub fn speak_request(&self, request: &SpeakRequest) -> Result<SpeechOutcome> {
        self.speak(&request.text, &request.options)
    }

    /// Voices offered by a freshly acquired engine
    ///
    /// # Errors
    ///
    /// Returns [`Engine`](crate::LimmaError::Engine) if the engine cannot be
    /// acquired or enumerated
    pub fn voices(&self) -> Result<Vec<Voice>> {
        let mut engine = (self.factory)()?;
        let voices = engine.voices();
        let stopped = engine.stop();

        let voices = voices?;
        stopped?;
        Ok(voices)
    }
}

fn drive(
    engine: &mut dyn SpeechEngine,
    text: &str,
    options: &SpeakOptions,
    rate: u32,
) -> std::result::Result<SpeechOutcome, EngineError> {
    let voices = engine.voices()?;

    let persona = if options.female {
        if let Some(voice) = find_female_voice(&voices) {
            debug!(target: "tts", voice = %voice.name, "selected female voice");
            engine.set_voice(voice)?;
            PersonaSelection::Matched {
                voice: voice.name.clone(),
            }
        } else {
            warn!(
                target: "tts",
                available = voices.len(),
                "no female voice found, using default voice"
            );
            PersonaSelection::DefaultVoice
        }
    } else {
        PersonaSelection::NotRequested
    };

    engine.set_rate(rate)?;
    engine.set_volume(options.volume)?;
    engine.say_and_wait(text)?;

    Ok(SpeechOutcome { persona })
}

/// Speak `text` through the espeak-ng backend
///
/// # Errors
///
/// See [`Speaker::speak`]
pub fn speak(text: &str, options: &SpeakOptions) -> Result<SpeechOutcome> {
    Speaker::espeak().speak(text, options)
}

/// Voices offered by the espeak-ng backend
///
/// # Errors
///
/// See [`Speaker::voices`]
pub fn list_voices() -> Result<Vec<Voice>> {
    Speaker::espeak().voices()
}
