//! Single-threaded command dispatcher holding the canvas and UI state.

use std::path::PathBuf;

use image::RgbaImage;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::events::{Action, ActionSet, Captions, Command, UiState};
use crate::processing::layout::FitResult;
use crate::render::canvas::Canvas;
use crate::render::caption::CaptionRenderer;
use crate::render::loader::decode_rgba8;
use crate::speech::{SpeechSynthesizer, Utterance, Voice};
use crate::volume::{Volume, VolumeIcon};

/// What a dispatched command produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    ImageDrawn(FitResult),
    OverlayDrawn,
    Cleared,
    Spoken(Utterance),
    VolumeChanged { volume: Volume, icon: VolumeIcon },
    VoiceSelected { name: String, known: bool },
    Voices(Vec<Voice>),
    Saved(PathBuf),
    Quit,
}

pub struct Session {
    state: UiState,
    canvas: Canvas,
    captions_renderer: CaptionRenderer,
    synth: Box<dyn SpeechSynthesizer>,
    /// Dimensions of the image currently on the canvas.
    image_size: Option<(u32, u32)>,
    captions: Option<Captions>,
    voices: Vec<Voice>,
    selected_voice: Option<String>,
    volume: Volume,
}

impl Session {
    pub fn new(
        canvas: Canvas,
        captions_renderer: CaptionRenderer,
        synth: Box<dyn SpeechSynthesizer>,
        volume: Volume,
    ) -> Self {
        Self {
            state: UiState::Idle,
            canvas,
            captions_renderer,
            synth,
            image_size: None,
            captions: None,
            voices: Vec::new(),
            selected_voice: None,
            volume,
        }
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn actions(&self) -> ActionSet {
        self.state.actions()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn captions(&self) -> Option<&Captions> {
        self.captions.as_ref()
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Voice selection is only meaningful once voices have been listed.
    pub fn voice_selection_enabled(&self) -> bool {
        !self.voices.is_empty()
    }

    pub fn has_image(&self) -> bool {
        self.image_size.is_some()
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image_size
    }

    fn require(&self, action: Action) -> Result<()> {
        if self.actions().allows(action) {
            Ok(())
        } else {
            Err(Error::ActionDisabled {
                action,
                state: self.state,
            })
        }
    }

    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        if let Some(action) = command.action() {
            self.require(action)?;
        }
        debug!(?command, state = %self.state, "dispatching");
        match command {
            Command::LoadImage(path) => {
                let img = decode_rgba8(&path)?;
                info!(
                    path = %path.display(),
                    width = img.width(),
                    height = img.height(),
                    "image loaded"
                );
                Ok(Outcome::ImageDrawn(self.show_image(&img)))
            }
            Command::GenerateOverlay(captions) => {
                self.canvas
                    .draw_captions(&self.captions_renderer, &captions);
                self.captions = Some(captions);
                self.state = UiState::TextGenerated;
                Ok(Outcome::OverlayDrawn)
            }
            Command::Clear => {
                self.canvas.clear();
                self.image_size = None;
                self.captions = None;
                self.state = UiState::Idle;
                Ok(Outcome::Cleared)
            }
            Command::Speak => {
                let utterance = self.utterance();
                self.synth.speak(&utterance)?;
                Ok(Outcome::Spoken(utterance))
            }
            Command::SetVolume(value) => {
                self.volume = Volume::new(value);
                let icon = self.volume.icon();
                debug!(icon = %icon.icon_path(), "volume icon");
                Ok(Outcome::VolumeChanged {
                    volume: self.volume,
                    icon,
                })
            }
            Command::SelectVoice(name) => {
                let known = self.voices.iter().any(|v| v.name == name);
                if !known {
                    warn!(voice = %name, "voice not in the listed voices; the default will be used");
                }
                self.selected_voice = Some(name.clone());
                Ok(Outcome::VoiceSelected { name, known })
            }
            Command::ListVoices => {
                self.voices = self.synth.voices()?;
                Ok(Outcome::Voices(self.voices.clone()))
            }
            Command::Save(path) => {
                self.canvas.save_png(&path)?;
                info!(path = %path.display(), "canvas saved");
                Ok(Outcome::Saved(path))
            }
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    /// Draw an already decoded image, as a successful load does.
    pub fn show_image(&mut self, img: &RgbaImage) -> FitResult {
        self.canvas.clear();
        self.canvas.fill_background();
        let placement = self.canvas.draw_image(img);
        self.image_size = Some(img.dimensions());
        self.captions = None;
        self.state = UiState::ImageLoaded;
        placement
    }

    /// Utterance for the generated captions with the current voice and volume.
    fn utterance(&self) -> Utterance {
        let text = self
            .captions
            .as_ref()
            .map(Captions::spoken_text)
            .unwrap_or_default();
        let voice = self
            .selected_voice
            .as_ref()
            .filter(|name| self.voices.iter().any(|v| &v.name == *name))
            .cloned();
        Utterance {
            text,
            voice,
            volume: self.volume.level(),
        }
    }
}
