use thiserror::Error;

use crate::events::{Action, UiState};

/// Library error type for meme generator operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A fit dimension was zero, negative or not finite.
    #[error("invalid dimension {name}: {value}")]
    InvalidDimension { name: &'static str, value: f64 },

    /// The command's action is disabled in the current UI state.
    #[error("{action} is disabled while {state}")]
    ActionDisabled { action: Action, state: UiState },

    /// A command line could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// No usable font face could be resolved for captions.
    #[error("no font available for family {0:?}")]
    FontUnavailable(String),

    /// The speech backend failed to list voices or start an utterance.
    #[error("speech error: {0}")]
    Speech(String),

    /// Decoding or encoding an image failed.
    #[error(transparent)]
    Image(#[from] image::ImageError),

    /// Underlying IO error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// YAML/serde configuration error.
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
