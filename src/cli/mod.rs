//! CLI argument parsing and command routing

use clap::{ArgGroup, Parser, Subcommand};

use crate::voice::SpeakOptions;

/// limma: talk to an LLM and speak the answers
#[derive(Debug, Parser)]
#[command(name = "limma")]
#[command(about = "Language Interface Model for Machine Automation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Send a prompt to the configured model and print the reply
    Generate {
        /// The prompt to send
        prompt: String,
    },

    /// Speak text through the local speech engine
    Speak {
        /// Text to speak
        text: String,

        /// Prefer a female-sounding voice
        #[arg(long)]
        female: bool,

        /// Use the default voice even if the config asks for a female one
        #[arg(long = "no-female", conflicts_with = "female")]
        no_female: bool,

        /// Speaking rate in words per minute
        #[arg(long, allow_negative_numbers = true)]
        rate: Option<i64>,

        /// Volume between 0.0 and 1.0
        #[arg(long, allow_negative_numbers = true)]
        volume: Option<f32>,
    },

    /// List voices offered by the speech engine
    Voices,

    /// Manage provider configuration
    #[command(group(ArgGroup::new("action").required(true).args(["get", "set", "list"])))]
    Config {
        /// Get a config value
        #[arg(long)]
        get: Option<String>,

        /// Set a config value
        #[arg(long, requires = "value")]
        set: Option<String>,

        /// Value to set (used with --set)
        #[arg(long)]
        value: Option<String>,

        /// List all config values
        #[arg(long)]
        list: bool,
    },

    /// Show version information
    Version,
}

impl Cli {
    /// Parse CLI arguments from environment
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Overlay `speak` flags on the configured speech defaults
///
/// `--female` and `--no-female` each override the configured preference.
#[must_use]
pub fn speak_options(
    defaults: SpeakOptions,
    female: bool,
    no_female: bool,
    rate: Option<i64>,
    volume: Option<f32>,
) -> SpeakOptions {
    SpeakOptions {
        female: if no_female { false } else { female || defaults.female },
        rate: rate.unwrap_or(defaults.rate),
        volume: volume.unwrap_or(defaults.volume),
    }
}

/// Show only the last four characters of a credential
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{tail}", "*".repeat(chars.len() - 4))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_speak() {
        let cli = Cli::try_parse_from([
            "limma", "speak", "hello", "--female", "--rate", "-5", "--volume", "0.5",
        ])
        .unwrap();
        match cli.command {
            Commands::Speak {
                text,
                female,
                no_female,
                rate,
                volume,
            } => {
                assert_eq!(text, "hello");
                assert!(female);
                assert!(!no_female);
                assert_eq!(rate, Some(-5));
                assert_eq!(volume, Some(0.5));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_set_requires_value() {
        assert!(Cli::try_parse_from(["limma", "config", "--set", "model"]).is_err());
    }

    #[test]
    fn test_female_flags_conflict() {
        assert!(Cli::try_parse_from(["limma", "speak", "hi", "--female", "--no-female"]).is_err());
    }

    #[test]
    fn test_speak_options_override_config() {
        let configured = SpeakOptions {
            female: true,
            rate: 180,
            volume: 0.5,
        };
        assert_eq!(speak_options(configured, false, false, None, None), configured);
        assert!(!speak_options(configured, false, true, None, None).female);
        assert!(speak_options(SpeakOptions::default(), true, false, None, None).female);

        let options = speak_options(configured, false, false, Some(120), Some(1.0));
        assert_eq!((options.rate, options.volume), (120, 1.0));
    }

    #[test]
    fn test_config_requires_action() {
        assert!(Cli::try_parse_from(["limma", "config"]).is_err());
        assert!(Cli::try_parse_from(["limma", "config", "--value", "x"]).is_err());
        assert!(Cli::try_parse_from(["limma", "config", "--list"]).is_ok());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "");
        assert_eq!(mask_secret("abc"), "***");
        assert_eq!(mask_secret("AIzaSyXYZ1234"), "*********1234");
    }
}
