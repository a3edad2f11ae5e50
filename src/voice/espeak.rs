//! espeak-ng backend
//!
//! Drives the `espeak-ng` binary (or legacy `espeak`) as a child process.
//! `ESPEAK_BIN` overrides the binary location; otherwise `PATH` is searched.

use std::{
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use tracing::debug;

use super::engine::{EngineError, Gender, SpeechEngine, Voice};

/// Environment variable pointing at the espeak binary
pub const ESPEAK_BIN_ENV: &str = "ESPEAK_BIN";

/// espeak-ng backend state for a single utterance
#[derive(Debug, Clone)]
pub struct EspeakEngine {
    bin: PathBuf,
    voice: Option<String>,
    words_per_minute: u32,
    amplitude: u32,
}

impl EspeakEngine {
    /// Locate the espeak binary and create an engine with espeak's defaults
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Unavailable`] if no binary is found
    pub fn new() -> Result<Self, EngineError> {
        let bin = find_binary().ok_or_else(|| {
            EngineError::Unavailable(format!(
                "espeak-ng not found on PATH (set {ESPEAK_BIN_ENV} to override)"
            ))
        })?;
        Ok(Self::with_binary(bin))
    }

    /// Create an engine using a specific binary
    #[must_use]
    pub fn with_binary(bin: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            voice: None,
            words_per_minute: 175,
            amplitude: 100,
        }
    }

    /// Arguments for speaking `text` with the current settings
    fn speak_args(&self, text: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(8);
        if let Some(voice) = &self.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("-s".to_string());
        args.push(self.words_per_minute.to_string());
        args.push("-a".to_string());
        args.push(self.amplitude.to_string());
        args.push("--".to_string());
        args.push(text.to_string());
        args
    }
}

impl SpeechEngine for EspeakEngine {
    fn voices(&mut self) -> Result<Vec<Voice>, EngineError> {
        let output = Command::new(&self.bin)
            .arg("--voices")
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EngineError::Voices(e.to_string()))?;

        if !output.status.success() {
            return Err(EngineError::Voices(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_voice_list(&String::from_utf8_lossy(&output.stdout)))
    }

    fn set_voice(&mut self, voice: &Voice) -> Result<(), EngineError> {
        if voice.id.is_empty() {
            return Err(EngineError::Configure(format!(
                "voice '{}' has no identifier",
                voice.name
            )));
        }
        self.voice = Some(voice.id.clone());
        Ok(())
    }

    fn set_rate(&mut self, words_per_minute: u32) -> Result<(), EngineError> {
        self.words_per_minute = words_per_minute;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(EngineError::Configure(format!("volume {volume} out of range")));
        }
        // espeak amplitude: 0-200, 100 is normal
        self.amplitude = (volume * 100.0).round() as u32;
        Ok(())
    }

    fn say_and_wait(&mut self, text: &str) -> Result<(), EngineError> {
        debug!(
            target: "tts",
            bin = %self.bin.display(),
            voice = ?self.voice,
            rate = self.words_per_minute,
            amplitude = self.amplitude,
            "espeak speaking"
        );

        let output = Command::new(&self.bin)
            .args(self.speak_args(text))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| EngineError::Playback(e.to_string()))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            Err(EngineError::Playback(if stderr.is_empty() {
                format!("espeak exited with {}", output.status)
            } else {
                stderr
            }))
        }
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        // say_and_wait reaps its child, nothing is left running
        Ok(())
    }
}

/// Parse `espeak-ng --voices` output
///
/// Columns: `Pty Language Age/Gender VoiceName File Other Languages`.
#[must_use]
pub fn parse_voice_list(stdout: &str) -> Vec<Voice> {
    stdout
        .lines()
        .skip_while(|line| !line.trim_start().starts_with("Pty"))
        .skip(1)
        .filter_map(|line| {
            let mut cols = line.split_whitespace();
            let _priority = cols.next()?;
            let language = cols.next()?;
            let age_gender = cols.next()?;
            let name = cols.next()?;
            let file = cols.next()?;
            Some(Voice {
                id: file.to_string(),
                name: name.replace('_', " "),
                language: language.to_string(),
                gender: parse_gender(age_gender),
            })
        })
        .collect()
}

/// Gender from an Age/Gender cell such as `--/F` or `50/M`
fn parse_gender(age_gender: &str) -> Option<Gender> {
    match age_gender.rsplit('/').next()? {
        "F" | "f" => Some(Gender::Female),
        "M" | "m" => Some(Gender::Male),
        _ => None,
    }
}

fn find_binary() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(ESPEAK_BIN_ENV) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Some(pb);
        }
    }
    find_on_path("espeak-ng").or_else(|| find_on_path("espeak"))
}

fn find_on_path(bin: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| Path::new(&dir).join(bin))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const VOICES: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  en-gb-x-rp      --/F      English_(Received_Pronunciation) gmw/en-GB-x-rp (en 4)
";

    #[test]
    fn test_parse_voice_list() {
        let voices = parse_voice_list(VOICES);
        assert_eq!(voices.len(), 3);
        assert_eq!(
            voices[1],
            Voice {
                id: "gmw/en-US".into(),
                name: "English (America)".into(),
                language: "en-us".into(),
                gender: Some(Gender::Male),
            }
        );
        assert_eq!(voices[2].gender, Some(Gender::Female));
    }

    #[test]
    fn test_parse_gender() {
        assert_eq!(parse_gender("--/F"), Some(Gender::Female));
        assert_eq!(parse_gender("50/M"), Some(Gender::Male));
        assert_eq!(parse_gender("--/-"), None);
    }

    #[test]
    fn test_female_voice_uses_gender_column() {
        let listing = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  kn              --/M      Kannada            dra/kn
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
 5  en-gb-x-rp      --/F      English_(Received_Pronunciation) gmw/en-GB-x-rp (en 4)
";
        let voices = parse_voice_list(listing);
        let voice = crate::voice::find_female_voice(&voices).unwrap();
        assert_eq!(voice.id, "gmw/en-GB-x-rp");
    }

    #[test]
    fn test_male_voice_name_hint_is_ignored() {
        let listing = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  kn              --/M      Kannada            dra/kn
 2  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";
        assert_eq!(crate::voice::find_female_voice(&parse_voice_list(listing)), None);
    }

    #[test]
    fn test_parse_voice_list_without_header() {
        assert!(parse_voice_list("espeak-ng: no voices\n").is_empty());
    }

    #[test]
    fn test_speak_args_reflect_settings() {
        let mut engine = EspeakEngine::with_binary("/usr/bin/espeak-ng");
        engine
            .set_voice(&Voice {
                id: "gmw/en-US".into(),
                name: "English (America)".into(),
                language: "en-us".into(),
                gender: None,
            })
            .unwrap();
        engine.set_rate(150).unwrap();
        engine.set_volume(0.9).unwrap();

        assert_eq!(
            engine.speak_args("-hello"),
            vec!["-v", "gmw/en-US", "-s", "150", "-a", "90", "--", "-hello"]
        );
    }

    #[test]
    fn test_missing_binary_is_playback_error() {
        let mut engine = EspeakEngine::with_binary("/nonexistent/espeak-ng");
        assert!(matches!(
            engine.say_and_wait("hi"),
            Err(EngineError::Playback(_))
        ));
        assert!(matches!(engine.voices(), Err(EngineError::Voices(_))));
    }
}
