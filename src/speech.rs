//! Text-to-speech backends.

use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::config::SpeechOptions;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
    pub default: bool,
}

impl Voice {
    /// Display label used in voice listings.
    pub fn label(&self) -> String {
        let mut label = format!("{} ({})", self.name, self.lang);
        if self.default {
            label.push_str(" -- DEFAULT");
        }
        label
    }
}

/// Everything needed to speak once; backends read no other state.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Option<String>,
    /// Volume in `[0, 1]`.
    pub volume: f32,
}

pub trait SpeechSynthesizer: Send {
    fn voices(&self) -> Result<Vec<Voice>>;
    fn speak(&self, utterance: &Utterance) -> Result<()>;
}

/// Build the backend described by the config.
pub fn from_options(opts: &SpeechOptions) -> Box<dyn SpeechSynthesizer> {
    if opts.enabled {
        Box::new(CommandSynthesizer::new(
            opts.program.clone(),
            opts.default_voice.clone(),
        ))
    } else {
        Box::new(SilentSynthesizer)
    }
}

/// Drives an espeak-compatible program.
#[derive(Debug, Clone)]
pub struct CommandSynthesizer {
    program: String,
    default_voice: Option<String>,
}

impl CommandSynthesizer {
    pub fn new(program: String, default_voice: Option<String>) -> Self {
        Self {
            program,
            default_voice,
        }
    }

    /// Arguments for one utterance; amplitude 100 is espeak's normal level.
    pub fn speak_args(utterance: &Utterance) -> Vec<String> {
        let amplitude = (utterance.volume.clamp(0.0, 1.0) * 100.0).round() as u32;
        let mut args = vec!["-a".to_string(), amplitude.to_string()];
        if let Some(voice) = &utterance.voice {
            args.push("-v".to_string());
            args.push(voice.clone());
        }
        args.push("--".to_string());
        args.push(utterance.text.clone());
        args
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>> {
        let output = Command::new(&self.program)
            .arg("--voices")
            .stderr(Stdio::null())
            .output()
            .map_err(|e| Error::Speech(format!("failed to run {}: {e}", self.program)))?;
        if !output.status.success() {
            return Err(Error::Speech(format!(
                "{} --voices exited with {}",
                self.program, output.status
            )));
        }
        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_voice_listing(&listing, self.default_voice.as_deref()))
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        let args = Self::speak_args(utterance);
        debug!(program = %self.program, ?args, "spawning speech");
        // Queued like a browser utterance; the child is not awaited.
        Command::new(&self.program)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| Error::Speech(format!("failed to run {}: {e}", self.program)))?;
        Ok(())
    }
}

/// Parse `espeak-ng --voices` output:
/// `Pty Language Age/Gender VoiceName File Other Languages`.
pub fn parse_voice_listing(listing: &str, default_voice: Option<&str>) -> Vec<Voice> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let (lang, name) = (cols.get(1)?, cols.get(3)?);
            Some(Voice {
                name: name.to_string(),
                lang: lang.to_string(),
                default: default_voice == Some(*name),
            })
        })
        .collect()
}

/// No voices; speaking is logged only.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSynthesizer;

impl SpeechSynthesizer for SilentSynthesizer {
    fn voices(&self) -> Result<Vec<Voice>> {
        Ok(Vec::new())
    }

    fn speak(&self, utterance: &Utterance) -> Result<()> {
        info!(text = %utterance.text, "speech disabled; not speaking");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Pty Language       Age/Gender VoiceName          File                 Other Languages
 5  af              --/M      Afrikaans          gmw/af
 2  en-gb           --/M      English_(Great_Britain) gmw/en            (en 2)
 5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
";

    #[test]
    fn parses_listing_and_flags_default() {
        let voices = parse_voice_listing(LISTING, Some("English_(America)"));
        assert_eq!(voices.len(), 3);
        assert_eq!(voices[0].label(), "Afrikaans (af)");
        assert_eq!(voices[2].lang, "en-us");
        assert_eq!(voices[2].label(), "English_(America) (en-us) -- DEFAULT");
        assert!(!voices[1].default);
    }

    #[test]
    fn speak_args_carry_volume_and_voice() {
        let utterance = Utterance {
            text: "top bottom".into(),
            voice: Some("af".into()),
            volume: 0.35,
        };
        assert_eq!(
            CommandSynthesizer::speak_args(&utterance),
            vec!["-a", "35", "-v", "af", "--", "top bottom"]
        );
        let quiet = Utterance {
            voice: None,
            volume: 0.0,
            ..utterance
        };
        assert_eq!(
            CommandSynthesizer::speak_args(&quiet),
            vec!["-a", "0", "--", "top bottom"]
        );
    }
}
