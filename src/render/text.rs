//! Label rasterization with fontdue

use std::path::Path;

use anyhow::Context;
use tiny_skia::{Pixmap, PixmapPaint, PremultipliedColorU8, Transform};

use crate::domain::Color;

/// Baseline offset below the line centre, relative to pixel size
const BASELINE_RATIO: f32 = 0.35;

/// Glyph rasterizer for one loaded font
pub struct TextRasterizer {
    font: fontdue::Font,
}

impl TextRasterizer {
    /// Load a TrueType/OpenType font file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|err| anyhow::anyhow!("Failed to parse font {}: {}", path.display(), err))?;
        log::debug!("Loaded font {}", path.display());
        Ok(Self { font })
    }

    /// Horizontal advance of `text` at `px_size`
    pub fn measure(&self, text: &str, px_size: f32) -> f32 {
        text.chars()
            .map(|c| self.font.metrics(c, px_size).advance_width)
            .sum()
    }

    /// Draw `text` centred on `(cx, cy)`
    pub fn draw(
        &self,
        pixmap: &mut Pixmap,
        text: &str,
        (cx, cy): (f32, f32),
        px_size: f32,
        color: Color,
        opacity: f32,
    ) {
        let [r, g, b, _] = color.to_rgba_u8(1.0);
        let mut pen_x = cx - self.measure(text, px_size) * 0.5;
        let baseline = cy + px_size * BASELINE_RATIO;

        for c in text.chars() {
            let (metrics, coverage) = self.font.rasterize(c, px_size);
            if metrics.width > 0 && metrics.height > 0 {
                if let Some(glyph) = glyph_pixmap(
                    metrics.width as u32,
                    metrics.height as u32,
                    &coverage,
                    [r, g, b],
                    opacity,
                ) {
                    let x = (pen_x + metrics.xmin as f32).round() as i32;
                    let y = (baseline - metrics.height as f32 - metrics.ymin as f32).round() as i32;
                    pixmap.draw_pixmap(
                        x,
                        y,
                        glyph.as_ref(),
                        &PixmapPaint::default(),
                        Transform::identity(),
                        None,
                    );
                }
            }
            pen_x += metrics.advance_width;
        }
    }
}

/// Colored, premultiplied glyph image from a coverage mask
fn glyph_pixmap(
    width: u32,
    height: u32,
    coverage: &[u8],
    [r, g, b]: [u8; 3],
    opacity: f32,
) -> Option<Pixmap> {
    let mut glyph = Pixmap::new(width, height)?;
    let opacity = opacity.clamp(0.0, 1.0);
    for (pixel, &cov) in glyph.pixels_mut().iter_mut().zip(coverage) {
        let a = (cov as f32 * opacity).round() as u16;
        let premultiply = |c: u8| (c as u16 * a / 255) as u8;
        if let Some(color) =
            PremultipliedColorU8::from_rgba(premultiply(r), premultiply(g), premultiply(b), a as u8)
        {
            *pixel = color;
        }
    }
    Some(glyph)
}
