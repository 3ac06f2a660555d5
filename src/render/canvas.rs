use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::config::CanvasOptions;
use crate::error::Result;
use crate::events::Captions;
use crate::processing::layout::{fit, FitResult};
use crate::render::caption::CaptionRenderer;

/// Fixed-size RGBA draw surface.
pub struct Canvas {
    surface: RgbaImage,
    background: [u8; 3],
    filter: FilterType,
}

impl Canvas {
    pub fn new(opts: &CanvasOptions) -> Self {
        Self {
            surface: RgbaImage::new(opts.width, opts.height),
            background: opts.background,
            filter: opts.filter.into(),
        }
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Every pixel fully transparent.
    pub fn clear(&mut self) {
        for px in self.surface.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    pub fn fill_background(&mut self) {
        let [r, g, b] = self.background;
        for px in self.surface.pixels_mut() {
            *px = Rgba([r, g, b, 255]);
        }
    }

    /// Scale `img` to fit the canvas and draw it at the fitted offset.
    pub fn draw_image(&mut self, img: &RgbaImage) -> FitResult {
        let placement = fit(
            f64::from(self.width()),
            f64::from(self.height()),
            f64::from(img.width()),
            f64::from(img.height()),
        );
        let (x, y, w, h) = placement.pixel_rect();
        debug!(x, y, w, h, "drawing image");
        let scaled = imageops::resize(img, w, h, self.filter);
        imageops::overlay(&mut self.surface, &scaled, x, y);
        placement
    }

    /// Top caption on its baseline, bottom caption above the bottom margin.
    pub fn draw_captions(&mut self, renderer: &CaptionRenderer, captions: &Captions) {
        let style = renderer.style();
        let center_x = self.width() as f32 / 2.0;
        let bottom_baseline = self.height() as f32 - style.bottom_margin;
        let top_baseline = style.top_baseline;
        renderer.draw_centered(&mut self.surface, &captions.top, center_x, top_baseline);
        renderer.draw_centered(&mut self.surface, &captions.bottom, center_x, bottom_baseline);
    }

    pub fn save_png(&self, path: &Path) -> Result<()> {
        self.surface
            .save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}
