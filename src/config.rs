use std::path::{Path, PathBuf};

use anyhow::{ensure, Result};
use image::imageops::FilterType;
use serde::Deserialize;

use crate::volume::Volume;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    pub canvas: CanvasOptions,
    pub caption: CaptionOptions,
    pub speech: SpeechOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CanvasOptions {
    pub width: u32,
    pub height: u32,
    /// RGB fill drawn behind a freshly loaded image.
    pub background: [u8; 3],
    pub filter: ResizeFilter,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            width: 400,
            height: 400,
            background: [0, 0, 0],
            filter: ResizeFilter::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CaptionOptions {
    pub font_family: String,
    /// Font file used instead of looking the family up.
    pub font_path: Option<PathBuf>,
    pub size_pt: f32,
    /// Baseline of the top caption, in pixels from the top edge.
    pub top_baseline: f32,
    /// Baseline of the bottom caption, in pixels from the bottom edge.
    pub bottom_margin: f32,
    pub fill: [u8; 3],
    pub stroke: [u8; 3],
    pub line_width: f32,
}

impl CaptionOptions {
    /// Font size in pixels at 96 dpi.
    pub fn size_px(&self) -> f32 {
        self.size_pt * 4.0 / 3.0
    }
}

impl Default for CaptionOptions {
    fn default() -> Self {
        Self {
            font_family: "Impact".to_string(),
            font_path: None,
            size_pt: 40.0,
            top_baseline: 60.0,
            bottom_margin: 20.0,
            fill: [255, 255, 255],
            stroke: [0, 0, 0],
            line_width: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SpeechOptions {
    pub enabled: bool,
    /// espeak-compatible text-to-speech program.
    pub program: String,
    pub default_voice: Option<String>,
    pub volume: Volume,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "espeak-ng".to_string(),
            default_voice: None,
            volume: Volume::default(),
        }
    }
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.canvas.width > 0 && self.canvas.height > 0,
            "canvas width and height must be greater than zero"
        );
        ensure!(
            self.caption.size_pt.is_finite() && self.caption.size_pt > 0.0,
            "caption.size-pt must be positive"
        );
        ensure!(
            self.caption.line_width.is_finite() && self.caption.line_width >= 0.0,
            "caption.line-width must not be negative"
        );
        ensure!(
            !self.speech.enabled || !self.speech.program.trim().is_empty(),
            "speech.program must be set when speech is enabled"
        );
        Ok(self)
    }
}
