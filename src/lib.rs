//! limma: Language Interface Model for Machine Automation
//!
//! Convenience building blocks for natural-language device control: a Gemini
//! provider adapter that turns a conversation into a reply, and a speech output
//! function that reads replies aloud through a local engine.

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod messages;
pub mod services;
pub mod voice;

// Re-exports for convenience
pub use config::{Config, ProviderConfig};
pub use error::{InvalidArgument, LimmaError, Result};
pub use messages::{Message, Role};
pub use services::{create_provider, generate, GeminiProvider, Provider};
pub use voice::{list_voices, speak, PersonaSelection, SpeakOptions, Speaker, SpeechOutcome};
