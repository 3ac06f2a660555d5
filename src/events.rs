use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::Error;

/// Top and bottom caption text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captions {
    pub top: String,
    pub bottom: String,
}

impl Captions {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: top.into(),
            bottom: bottom.into(),
        }
    }

    /// Both captions joined by a single space, as they are read aloud.
    pub fn spoken_text(&self) -> String {
        format!("{} {}", self.top, self.bottom)
    }
}

/// One discrete user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    LoadImage(PathBuf),
    GenerateOverlay(Captions),
    Clear,
    Speak,
    SetVolume(u8),
    SelectVoice(String),
    ListVoices,
    Save(PathBuf),
    Quit,
}

impl Command {
    /// The toggled action this command needs, if any.
    pub fn action(&self) -> Option<Action> {
        match self {
            Self::GenerateOverlay(_) => Some(Action::Generate),
            Self::Clear => Some(Action::Clear),
            Self::Speak => Some(Action::ReadAloud),
            _ => None,
        }
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let no_args = |cmd: Command| {
            if rest.is_empty() {
                Ok(cmd)
            } else {
                Err(Error::Parse(format!("{verb} takes no arguments")))
            }
        };
        let required = |what: &str| {
            if rest.is_empty() {
                Err(Error::Parse(format!("{verb} requires {what}")))
            } else {
                Ok(rest.to_string())
            }
        };
        match verb.to_ascii_lowercase().as_str() {
            "load" => Ok(Self::LoadImage(PathBuf::from(required("a path")?))),
            "generate" => {
                let (top, bottom) = rest.split_once('|').unwrap_or((rest, ""));
                Ok(Self::GenerateOverlay(Captions::new(top.trim(), bottom.trim())))
            }
            "clear" => no_args(Self::Clear),
            "speak" => no_args(Self::Speak),
            "volume" => {
                let raw = required("a value")?;
                let value: u8 = raw
                    .parse()
                    .map_err(|_| Error::Parse(format!("volume must be 0-100, got {raw:?}")))?;
                if value > 100 {
                    return Err(Error::Parse(format!("volume must be 0-100, got {value}")));
                }
                Ok(Self::SetVolume(value))
            }
            "voice" => Ok(Self::SelectVoice(required("a voice name")?)),
            "voices" => no_args(Self::ListVoices),
            "save" => Ok(Self::Save(PathBuf::from(required("a path")?))),
            "quit" | "exit" => no_args(Self::Quit),
            "" => Err(Error::Parse("empty command".into())),
            other => Err(Error::Parse(format!("unknown command {other:?}"))),
        }
    }
}

/// Actions that are enabled or disabled together with the UI state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Generate,
    Clear,
    ReadAloud,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Generate => "generate",
            Self::Clear => "clear",
            Self::ReadAloud => "read aloud",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    ImageLoaded,
    TextGenerated,
}

impl UiState {
    pub fn actions(self) -> ActionSet {
        match self {
            Self::Idle => ActionSet {
                generate: false,
                clear: false,
                read_aloud: false,
            },
            Self::ImageLoaded => ActionSet {
                generate: true,
                clear: false,
                read_aloud: false,
            },
            Self::TextGenerated => ActionSet {
                generate: false,
                clear: true,
                read_aloud: true,
            },
        }
    }
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::ImageLoaded => "image loaded",
            Self::TextGenerated => "text generated",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet {
    pub generate: bool,
    pub clear: bool,
    pub read_aloud: bool,
}

impl ActionSet {
    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Generate => self.generate,
            Action::Clear => self.clear,
            Action::ReadAloud => self.read_aloud,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generate_with_both_captions() {
        let cmd: Command = "generate  ONE DOES NOT | simply parse ".parse().unwrap();
        assert_eq!(
            cmd,
            Command::GenerateOverlay(Captions::new("ONE DOES NOT", "simply parse"))
        );
    }

    #[test]
    fn generate_without_separator_is_top_only() {
        let cmd: Command = "generate hello".parse().unwrap();
        assert_eq!(cmd, Command::GenerateOverlay(Captions::new("hello", "")));
    }

    #[test]
    fn rejects_bad_volume_and_unknown_verbs() {
        assert!("volume 101".parse::<Command>().is_err());
        assert!("volume loud".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
        assert!("clear now".parse::<Command>().is_err());
        assert!("load".parse::<Command>().is_err());
    }

    #[test]
    fn paths_keep_inner_spaces() {
        let cmd: Command = "load /tmp/my cat.png".parse().unwrap();
        assert_eq!(cmd, Command::LoadImage(PathBuf::from("/tmp/my cat.png")));
    }

    #[test]
    fn spoken_text_always_has_separator() {
        assert_eq!(Captions::new("", "bottom").spoken_text(), " bottom");
        assert_eq!(Captions::new("top", "bottom").spoken_text(), "top bottom");
    }

    #[test]
    fn action_sets_follow_state() {
        assert!(!UiState::Idle.actions().allows(Action::Generate));
        assert!(UiState::ImageLoaded.actions().allows(Action::Generate));
        assert!(!UiState::ImageLoaded.actions().allows(Action::ReadAloud));
        let generated = UiState::TextGenerated.actions();
        assert!(generated.clear && generated.read_aloud && !generated.generate);
    }
}
