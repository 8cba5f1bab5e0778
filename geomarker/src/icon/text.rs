//! Text measurement and rasterization for icon composition.
//!
//! Fonts are not bundled with the crate. The host application loads its font data into the
//! [`FontService`]; until it does, the service falls back to approximate metrics so that
//! bubbles are still laid out and filled, only the glyph painting is skipped.

use bytes::Bytes;

use crate::color::Color;
use crate::error::GeomarkerError;
use crate::icon::canvas::Canvas;

/// Font weight.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontWeight(u16);

impl FontWeight {
    /// Normal font.
    pub const NORMAL: Self = FontWeight(400);
    /// Bold font.
    pub const BOLD: Self = FontWeight(700);

    /// Resolves a CSS-like weight string. Everything from medium up renders bold, the rest
    /// renders normal, matching the platform annotation views this crate replaces.
    pub fn from_css(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "bold" | "700" | "800" | "900" | "600" | "500" | "medium" => Self::BOLD,
            _ => Self::NORMAL,
        }
    }

    fn is_bold(&self) -> bool {
        self.0 >= 600
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        Self::NORMAL
    }
}

/// Measured extent of a text block in device pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextExtent {
    /// Width of the widest line.
    pub width: f32,
    /// Total height of all lines.
    pub height: f32,
}

/// Measures and rasterizes text for marker icons.
#[derive(Default)]
pub struct FontService {
    font: Option<fontdue::Font>,
}

/// Advance of a glyph relative to the font size when no font data is loaded. Wide (CJK)
/// characters get a full em.
const FALLBACK_ADVANCE: f32 = 0.6;
const FALLBACK_LINE_HEIGHT: f32 = 1.2;

impl FontService {
    /// Creates a service with no font loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a font from the given binary data (TTF/OTF), replacing any previous one.
    pub fn load_fonts(&mut self, fonts_data: Bytes) -> Result<(), GeomarkerError> {
        let font = fontdue::Font::from_bytes(fonts_data.as_ref(), fontdue::FontSettings::default())
            .map_err(|error| GeomarkerError::FontData(error.to_string()))?;
        self.font = Some(font);
        Ok(())
    }

    /// Returns true if glyphs can actually be painted.
    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Measures the text at the given pixel size. Lines beyond `max_lines` are ignored.
    pub fn measure(&self, text: &str, px: f32, max_lines: usize) -> TextExtent {
        let line_height = self.line_height(px);
        let mut extent = TextExtent::default();

        for line in text.lines().take(max_lines.max(1)) {
            extent.width = extent.width.max(self.line_width(line, px));
            extent.height += line_height;
        }

        extent
    }

    /// Paints the text centered at `(cx, cy)`, one line under another.
    pub(crate) fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        px: f32,
        weight: FontWeight,
        color: Color,
        cx: f32,
        cy: f32,
        max_lines: usize,
    ) {
        let Some(font) = &self.font else {
            // Layout-only mode: the bubble is still rendered by the caller.
            return;
        };

        let line_height = self.line_height(px);
        let lines: Vec<&str> = text.lines().take(max_lines.max(1)).collect();
        let block_height = line_height * lines.len() as f32;

        let metrics = font.horizontal_line_metrics(px);
        let ascent = metrics.map(|m| m.ascent).unwrap_or(px * 0.8);
        let descent = metrics.map(|m| m.descent).unwrap_or(-px * 0.2);

        let mut line_top = cy - block_height / 2.0;
        for line in lines {
            // Baseline centered within the line box.
            let baseline = line_top + line_height / 2.0 + (ascent + descent) / 2.0;
            self.draw_line(canvas, font, line, px, weight, color, cx, baseline);
            line_top += line_height;
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &self,
        canvas: &mut Canvas,
        font: &fontdue::Font,
        line: &str,
        px: f32,
        weight: FontWeight,
        color: Color,
        cx: f32,
        baseline: f32,
    ) {
        let width = self.line_width(line, px);
        let mut cursor = cx - width / 2.0;

        for ch in line.chars() {
            let (metrics, coverage) = font.rasterize(ch, px);
            let glyph_left = cursor + metrics.xmin as f32;
            let glyph_top = baseline - metrics.height as f32 - metrics.ymin as f32;

            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let value = coverage[row * metrics.width + col] as f32 / 255.0;
                    if value == 0.0 {
                        continue;
                    }
                    let x = (glyph_left + col as f32) as i64;
                    let y = (glyph_top + row as f32) as i64;
                    canvas.blend_coverage(x, y, color, value);
                    if weight.is_bold() {
                        // Faux bold: repeat the coverage one pixel to the right.
                        canvas.blend_coverage(x + 1, y, color, value);
                    }
                }
            }

            cursor += metrics.advance_width;
        }
    }

    fn line_width(&self, line: &str, px: f32) -> f32 {
        match &self.font {
            Some(font) => line
                .chars()
                .map(|ch| font.metrics(ch, px).advance_width)
                .sum(),
            None => line
                .chars()
                .map(|ch| {
                    if ch.is_ascii() {
                        px * FALLBACK_ADVANCE
                    } else {
                        px
                    }
                })
                .sum(),
        }
    }

    fn line_height(&self, px: f32) -> f32 {
        match &self.font {
            Some(font) => font
                .horizontal_line_metrics(px)
                .map(|m| m.new_line_size)
                .unwrap_or(px * FALLBACK_LINE_HEIGHT),
            None => px * FALLBACK_LINE_HEIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn css_weight_resolution() {
        assert_eq!(FontWeight::from_css("bold"), FontWeight::BOLD);
        assert_eq!(FontWeight::from_css("700"), FontWeight::BOLD);
        assert_eq!(FontWeight::from_css("Medium"), FontWeight::BOLD);
        assert_eq!(FontWeight::from_css("normal"), FontWeight::NORMAL);
        assert_eq!(FontWeight::from_css("100"), FontWeight::NORMAL);
        assert_eq!(FontWeight::from_css(""), FontWeight::NORMAL);
    }

    #[test]
    fn fallback_metrics_are_deterministic() {
        let service = FontService::new();
        assert!(!service.has_font());

        let extent = service.measure("abc", 14.0, 1);
        assert_eq!(extent.width, 14.0 * FALLBACK_ADVANCE * 3.0);
        assert_eq!(extent.height, 14.0 * FALLBACK_LINE_HEIGHT);

        // CJK characters take a full em.
        let wide = service.measure("杭州", 14.0, 1);
        assert_eq!(wide.width, 28.0);
    }

    #[test]
    fn measure_respects_max_lines() {
        let service = FontService::new();
        let extent = service.measure("one\ntwo\nthree", 10.0, 2);
        assert_eq!(extent.height, 10.0 * FALLBACK_LINE_HEIGHT * 2.0);
        // "three" is the widest line but is cut off by the line limit.
        assert_eq!(extent.width, 3.0 * 10.0 * FALLBACK_ADVANCE);
    }

    #[test]
    fn rejects_invalid_font_data() {
        let mut service = FontService::new();
        assert_matches!(
            service.load_fonts(Bytes::from_static(b"not a font")),
            Err(GeomarkerError::FontData(_))
        );
        assert!(!service.has_font());
    }
}
