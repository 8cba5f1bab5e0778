//! Composition of the `custom` marker style: a text bubble over an optional image.

use geomarker_types::Point2;

use crate::color::Color;
use crate::decoded_image::DecodedImage;
use crate::icon::canvas::{Canvas, Rect};
use crate::icon::text::{FontService, FontWeight};
use crate::marker::CustomStyle;

const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_PADDING: Point2 = Point2 { x: 6.0, y: 4.0 };
const CORNER_RADIUS: f32 = 6.0;
const DEFAULT_BACKGROUND: Color = Color::from_hex("#5981D8");

/// Bubble styling with all defaults applied.
struct ResolvedStyle {
    color: Color,
    font_size: f32,
    weight: FontWeight,
    max_lines: usize,
    padding: Point2,
    background: Color,
}

impl ResolvedStyle {
    fn new(style: Option<&crate::marker::TextStyle>) -> Self {
        let mut resolved = Self {
            color: Color::WHITE,
            font_size: DEFAULT_FONT_SIZE as f32,
            weight: FontWeight::BOLD,
            max_lines: 1,
            padding: DEFAULT_PADDING,
            background: DEFAULT_BACKGROUND,
        };

        let Some(style) = style else {
            return resolved;
        };

        if let Some(color) = &style.color {
            resolved.color = Color::from_hex_or(color, Color::WHITE);
        }
        if let Some(size) = style.font_size {
            resolved.font_size = size as f32;
        }
        if let Some(weight) = &style.font_weight {
            resolved.weight = FontWeight::from_css(weight);
        }
        if let Some(lines) = style.number_of_lines {
            resolved.max_lines = (lines.max(1)) as usize;
        }
        if let Some(padding) = style.padding {
            resolved.padding = padding;
        }
        if let Some(background) = &style.background_color {
            resolved.background = Color::from_hex_or(background, DEFAULT_BACKGROUND);
        }

        resolved
    }
}

pub(super) fn compose(
    text: Option<&str>,
    style: &CustomStyle,
    image: Option<&DecodedImage>,
    fonts: &FontService,
    scale: f32,
) -> DecodedImage {
    let resolved = ResolvedStyle::new(style.text_style.as_ref());
    let text = text.filter(|text| !text.is_empty());

    let (bubble_w, bubble_h) = match text {
        Some(text) => {
            let extent = fonts.measure(text, resolved.font_size * scale, resolved.max_lines);
            (
                extent.width + resolved.padding.x as f32 * 2.0 * scale,
                extent.height + resolved.padding.y as f32 * 2.0 * scale,
            )
        }
        None => (0.0, 0.0),
    };

    // An explicit size overrides the bitmap's intrinsic dimensions; both are logical units.
    let image_size = image.map(|bitmap| {
        let logical = style
            .image
            .as_ref()
            .and_then(|source| source.size)
            .unwrap_or_else(|| {
                geomarker_types::Size::new(bitmap.width() as f64, bitmap.height() as f64)
            });
        (
            logical.width() as f32 * scale,
            logical.height() as f32 * scale,
        )
    });

    let (image_w, image_h) = image_size.unwrap_or((0.0, 0.0));
    let total_w = image_w.max(bubble_w).max(1.0);
    let total_h = image_h.max(bubble_h).max(1.0);

    let mut canvas = Canvas::new(total_w.ceil() as u32, total_h.ceil() as u32);
    let cx = canvas.width() as f32 / 2.0;
    let cy = canvas.height() as f32 / 2.0;

    if let (Some(bitmap), Some((w, h))) = (image, image_size) {
        canvas.draw_image(
            bitmap,
            Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0),
        );
    }

    if let Some(text) = text {
        let offset = style.text_offset.unwrap_or_default();
        let bubble_cx = cx + offset.x as f32 * scale;
        let bubble_cy = cy + offset.y as f32 * scale;

        canvas.fill_rounded_rect(
            Rect::new(
                bubble_cx - bubble_w / 2.0,
                bubble_cy - bubble_h / 2.0,
                bubble_cx + bubble_w / 2.0,
                bubble_cy + bubble_h / 2.0,
            ),
            CORNER_RADIUS * scale,
            resolved.background,
        );
        fonts.draw(
            &mut canvas,
            text,
            resolved.font_size * scale,
            resolved.weight,
            resolved.color,
            bubble_cx,
            bubble_cy,
            resolved.max_lines,
        );
    }

    canvas.into_image()
}
