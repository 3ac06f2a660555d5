//! Caption text rasterisation: filled glyphs with an outline stroke,
//! horizontally centered on an anchor and sitting on a baseline.

use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontArc, FontVec, PxScale, ScaleFont};
use fontdb::{Database, Family, Query};
use image::{Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::config::CaptionOptions;
use crate::error::{Error, Result};

const FALLBACK_FAMILIES: &[&str] = &["Anton", "Oswald", "DejaVu Sans", "Liberation Sans"];

/// Draws captions with a resolved font. Without a font, text is skipped.
pub struct CaptionRenderer {
    font: Option<FontArc>,
    style: CaptionOptions,
}

impl CaptionRenderer {
    pub fn new(font: Option<FontArc>, style: CaptionOptions) -> Self {
        Self { font, style }
    }

    /// Resolve the configured font and build a renderer around it.
    pub fn from_options(style: CaptionOptions) -> Result<Self> {
        let font = load_font(&style)?;
        Ok(Self::new(Some(font), style))
    }

    pub fn style(&self) -> &CaptionOptions {
        &self.style
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    fn scale(&self) -> PxScale {
        PxScale::from(self.style.size_px())
    }

    /// Advance width of `text` in pixels, kerning included.
    pub fn text_width(&self, text: &str) -> f32 {
        let Some(font) = &self.font else {
            return 0.0;
        };
        let scaled = font.as_scaled(self.scale());
        let mut width = 0.0;
        let mut previous = None;
        for ch in text.chars().filter(|c| !c.is_control()) {
            let glyph = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, glyph);
            }
            width += scaled.h_advance(glyph);
            previous = Some(glyph);
        }
        width
    }

    /// Fill `text` then stroke its outline, centered on `center_x`.
    pub fn draw_centered(&self, canvas: &mut RgbaImage, text: &str, center_x: f32, baseline: f32) {
        let Some(font) = &self.font else {
            warn!("no caption font resolved; skipping text {text:?}");
            return;
        };
        if text.trim().is_empty() {
            return;
        }
        let left = center_x - self.text_width(text) / 2.0;
        let pad = (self.style.line_width / 2.0).ceil().max(0.0) as i64 + 1;
        let mut mask = CoverageMask::for_canvas(canvas.width(), canvas.height());
        rasterise(font, self.scale(), text, left, baseline, &mut mask);
        let Some(bounds) = mask.bounds(pad) else {
            return;
        };
        blend_mask(canvas, &mask, bounds, self.style.fill);
        if self.style.line_width > 0.0 {
            let stroke = mask.outline(self.style.line_width / 2.0, bounds);
            blend_mask(canvas, &stroke, bounds, self.style.stroke);
        }
    }
}

fn rasterise(
    font: &FontArc,
    scale: PxScale,
    text: &str,
    left: f32,
    baseline: f32,
    mask: &mut CoverageMask,
) {
    let scaled = font.as_scaled(scale);
    let mut cursor_x = left;
    let mut previous = None;
    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let glyph = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            cursor_x += scaled.kern(prev, glyph);
        }
        let advance = scaled.h_advance(glyph);
        let mut positioned = scaled.scaled_glyph(ch);
        positioned.position = point(cursor_x, baseline);
        if let Some(outline) = font.outline_glyph(positioned) {
            let bounds = outline.px_bounds();
            outline.draw(|x, y, coverage| {
                mask.add(
                    bounds.min.x as i64 + x as i64,
                    bounds.min.y as i64 + y as i64,
                    coverage,
                );
            });
        }
        cursor_x += advance;
        previous = Some(glyph);
    }
}

/// Inclusive-exclusive pixel box `[x0, x1) x [y0, y1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

/// Per-pixel coverage in `[0, 1]` the size of the canvas.
#[derive(Debug, Clone)]
pub(crate) struct CoverageMask {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl CoverageMask {
    pub(crate) fn for_canvas(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; (width as usize) * (height as usize)],
        }
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some((y as usize) * (self.width as usize) + x as usize)
    }

    pub(crate) fn get(&self, x: i64, y: i64) -> f32 {
        self.index(x, y).map(|i| self.data[i]).unwrap_or(0.0)
    }

    pub(crate) fn add(&mut self, x: i64, y: i64, coverage: f32) {
        if let Some(i) = self.index(x, y) {
            self.data[i] = (self.data[i] + coverage).min(1.0);
        }
    }

    /// Box around all covered pixels, grown by `pad` and clipped to the canvas.
    pub(crate) fn bounds(&self, pad: i64) -> Option<PixelBounds> {
        let mut found: Option<(u32, u32, u32, u32)> = None;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.data[(y as usize) * (self.width as usize) + x as usize] <= 0.0 {
                    continue;
                }
                found = Some(match found {
                    None => (x, y, x, y),
                    Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
                });
            }
        }
        let (x0, y0, x1, y1) = found?;
        let grow = |v: u32, by: i64, max: u32| (v as i64 + by).clamp(0, max as i64) as u32;
        Some(PixelBounds {
            x0: grow(x0, -pad, self.width),
            y0: grow(y0, -pad, self.height),
            x1: grow(x1 + 1, pad, self.width),
            y1: grow(y1 + 1, pad, self.height),
        })
    }

    /// Band of width `2 * radius` centered on the coverage edge:
    /// dilation minus erosion over a disc of `radius` pixels.
    ///
    /// The disc never shrinks below one pixel; radii under one instead
    /// scale the band's coverage down.
    pub(crate) fn outline(&self, radius: f32, bounds: PixelBounds) -> Self {
        let disc = radius.max(1.0);
        let strength = radius.clamp(0.0, 1.0);
        let reach = disc.ceil() as i64;
        let offsets: Vec<(i64, i64)> = (-reach..=reach)
            .flat_map(|dy| (-reach..=reach).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| ((dx * dx + dy * dy) as f32).sqrt() <= disc)
            .collect();
        let mut out = Self::for_canvas(self.width, self.height);
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let (x, y) = (x as i64, y as i64);
                let mut dilated: f32 = 0.0;
                let mut eroded: f32 = 1.0;
                for &(dx, dy) in &offsets {
                    let c = self.get(x + dx, y + dy);
                    dilated = dilated.max(c);
                    eroded = eroded.min(c);
                }
                if let Some(i) = out.index(x, y) {
                    out.data[i] = ((dilated - eroded) * strength).clamp(0.0, 1.0);
                }
            }
        }
        out
    }
}

fn blend_mask(canvas: &mut RgbaImage, mask: &CoverageMask, bounds: PixelBounds, rgb: [u8; 3]) {
    for y in bounds.y0..bounds.y1.min(canvas.height()) {
        for x in bounds.x0..bounds.x1.min(canvas.width()) {
            let alpha = mask.get(x as i64, y as i64);
            if alpha > 0.0 {
                blend_pixel(canvas.get_pixel_mut(x, y), rgb, alpha);
            }
        }
    }
}

/// Source-over blend of an opaque colour at `alpha` coverage.
fn blend_pixel(px: &mut Rgba<u8>, rgb: [u8; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    let dst_a = f32::from(px[3]) / 255.0;
    for c in 0..3 {
        let src = f32::from(rgb[c]);
        let dst = f32::from(px[c]);
        px[c] = (src * a + dst * (1.0 - a)).round() as u8;
    }
    px[3] = ((a + dst_a * (1.0 - a)) * 255.0).round() as u8;
}

/// Resolve a caption font: explicit file, bundled assets, then system faces.
pub fn load_font(opts: &CaptionOptions) -> Result<FontArc> {
    if let Some(path) = &opts.font_path {
        let data = fs::read(path)?;
        return FontArc::try_from_vec(data)
            .map_err(|_| Error::FontUnavailable(path.display().to_string()));
    }
    if let Some(font) = load_font_from_assets(&opts.font_family) {
        return Ok(font);
    }

    let mut db = Database::new();
    db.load_system_fonts();
    if let Some(font) = load_system_font(&db, &opts.font_family) {
        return Ok(font);
    }
    warn!(
        family = %opts.font_family,
        "caption font not installed; trying fallbacks"
    );
    for family in FALLBACK_FAMILIES
        .iter()
        .map(|name| Family::Name(name))
        .chain([Family::SansSerif])
    {
        if let Some(id) = db.query(&Query {
            families: &[family],
            ..Default::default()
        }) && let Some(font) = font_from_db(&db, id)
        {
            return Ok(font);
        }
    }
    Err(Error::FontUnavailable(opts.font_family.clone()))
}

fn load_font_from_assets(requested: &str) -> Option<FontArc> {
    let fonts_dir = Path::new("assets/fonts");
    let requested_lower = requested.to_lowercase();
    for entry in fs::read_dir(fonts_dir).ok()?.flatten() {
        let path = entry.path();
        let ext_ok = path
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| matches!(ext.to_lowercase().as_str(), "ttf" | "otf"))
            .unwrap_or(false);
        let stem_ok = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase() == requested_lower)
            .unwrap_or(false);
        if !(path.is_file() && ext_ok && stem_ok) {
            continue;
        }
        match fs::read(&path).map(FontArc::try_from_vec) {
            Ok(Ok(font)) => {
                debug!("caption font from {}", path.display());
                return Some(font);
            }
            _ => warn!("unusable font file {}", path.display()),
        }
    }
    None
}

fn load_system_font(db: &Database, name: &str) -> Option<FontArc> {
    let requested_lower = name.to_lowercase();
    let face_id = db.faces().find_map(|face| {
        let matches_family = face
            .families
            .iter()
            .any(|(family, _)| family.to_lowercase() == requested_lower)
            || face.post_script_name.to_lowercase() == requested_lower;
        matches_family.then_some(face.id)
    })?;
    font_from_db(db, face_id)
}

fn font_from_db(db: &Database, id: fontdb::ID) -> Option<FontArc> {
    db.with_face_data(id, |data, index| {
        FontVec::try_from_vec_and_index(data.to_vec(), index)
            .ok()
            .map(FontArc::new)
    })?
}
