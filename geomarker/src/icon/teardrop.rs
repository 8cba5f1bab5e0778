//! Composition of the `teardrop` marker style.

use crate::color::Color;
use crate::decoded_image::DecodedImage;
use crate::icon::canvas::{Canvas, Rect};
use crate::icon::text::{FontService, FontWeight};
use crate::marker::TeardropStyle;

// All constants are logical units, scaled to device pixels at composition time.
const DROP_WIDTH: f32 = 20.0;
const DROP_HEIGHT: f32 = 24.0;
const LABEL_FONT_SIZE: f32 = 14.0;
const CIRCLE_DIAMETER: f32 = 12.0;
const CIRCLE_LINE_WIDTH: f32 = 2.0;
const INFO_GAP: f32 = 6.0;
const INFO_PADDING_H: f32 = 8.0;
const INFO_PADDING_V: f32 = 4.0;
const INFO_CORNER_RADIUS: f32 = 12.0;
const INFO_GLYPH_SIZE: f32 = 14.0;
const INFO_GLYPH_GAP: f32 = 4.0;
const INFO_FONT_SIZE: f32 = 13.0;

pub(super) fn compose(style: &TeardropStyle, fonts: &FontService, scale: f32) -> DecodedImage {
    let fill = style.resolve_fill();
    let info_text = style.info_text.as_deref().filter(|text| !text.is_empty());

    let drop_w = DROP_WIDTH * scale;
    let drop_h = DROP_HEIGHT * scale;

    let info_size = info_text.map(|text| {
        let extent = fonts.measure(text, INFO_FONT_SIZE * scale, 1);
        let content_h = extent.height.max(INFO_GLYPH_SIZE * scale);
        (
            extent.width + (INFO_GLYPH_SIZE + INFO_GLYPH_GAP + INFO_PADDING_H * 2.0) * scale,
            content_h + INFO_PADDING_V * 2.0 * scale,
        )
    });

    let total_w = info_size.map(|(w, _)| w).unwrap_or(0.0).max(drop_w);
    let total_h = match info_size {
        Some((_, h)) => drop_h + INFO_GAP * scale + h,
        None => drop_h,
    };

    let mut canvas = Canvas::new(total_w.ceil() as u32, total_h.ceil() as u32);
    let cx = canvas.width() as f32 / 2.0;
    let drop_top = canvas.height() as f32 - drop_h;

    canvas.fill_teardrop(
        Rect::new(cx - drop_w / 2.0, drop_top, cx + drop_w / 2.0, drop_top + drop_h),
        fill,
    );

    // Label (or an outlined circle when there is none) sits in the circular head of the drop.
    let head_cy = drop_top + drop_w / 2.0;
    match style.label.as_deref().filter(|label| !label.is_empty()) {
        Some(label) => {
            fonts.draw(
                &mut canvas,
                label,
                LABEL_FONT_SIZE * scale,
                FontWeight::NORMAL,
                Color::WHITE,
                cx,
                head_cy,
                1,
            );
        }
        None => {
            canvas.stroke_circle(
                cx,
                head_cy,
                CIRCLE_DIAMETER / 2.0 * scale,
                CIRCLE_LINE_WIDTH * scale,
                Color::WHITE,
            );
        }
    }

    if let (Some(text), Some((info_w, info_h))) = (info_text, info_size) {
        draw_info_capsule(&mut canvas, fonts, text, cx, info_w, info_h, scale);
    }

    canvas.into_image()
}

/// White capsule with an icon glyph and a short text line, stacked above the drop.
fn draw_info_capsule(
    canvas: &mut Canvas,
    fonts: &FontService,
    text: &str,
    cx: f32,
    width: f32,
    height: f32,
    scale: f32,
) {
    let rect = Rect::new(cx - width / 2.0, 0.0, cx + width / 2.0, height);
    let radius = INFO_CORNER_RADIUS * scale;
    canvas.fill_rounded_rect(rect, radius, Color::WHITE);
    canvas.stroke_rounded_rect(rect, radius, 1.0, Color::LIGHT_GRAY);

    let cy = height / 2.0;
    let glyph_cx = rect.left + (INFO_PADDING_H + INFO_GLYPH_SIZE / 2.0) * scale;
    draw_glyph(canvas, glyph_cx, cy, INFO_GLYPH_SIZE / 2.0 * scale);

    let text_left = rect.left + (INFO_PADDING_H + INFO_GLYPH_SIZE + INFO_GLYPH_GAP) * scale;
    let text_width = fonts.measure(text, INFO_FONT_SIZE * scale, 1).width;
    fonts.draw(
        canvas,
        text,
        INFO_FONT_SIZE * scale,
        FontWeight::NORMAL,
        Color::BLACK,
        text_left + text_width / 2.0,
        cy,
        1,
    );
}

/// Small clock glyph: an outlined circle with two hands.
fn draw_glyph(canvas: &mut Canvas, cx: f32, cy: f32, radius: f32) {
    let line = (radius / 4.0).max(1.0);
    canvas.stroke_circle(cx, cy, radius - line / 2.0, line, Color::DARK_GRAY);
    canvas.fill_rounded_rect(
        Rect::new(cx - line / 2.0, cy - radius * 0.6, cx + line / 2.0, cy),
        0.0,
        Color::DARK_GRAY,
    );
    canvas.fill_rounded_rect(
        Rect::new(cx, cy - line / 2.0, cx + radius * 0.45, cy + line / 2.0),
        0.0,
        Color::DARK_GRAY,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_drop_has_fixed_size() {
        let image = compose(&TeardropStyle::default(), &FontService::new(), 1.0);
        assert_eq!((image.width(), image.height()), (20, 24));

        let scaled = compose(&TeardropStyle::default(), &FontService::new(), 2.0);
        assert_eq!((scaled.width(), scaled.height()), (40, 48));
    }

    #[test]
    fn info_text_grows_the_canvas_upwards() {
        let style = TeardropStyle {
            info_text: Some("opens 9:00".into()),
            ..Default::default()
        };
        let image = compose(&style, &FontService::new(), 1.0);

        // Capsule is wider than the drop and stacked above it with a gap.
        assert!(image.width() > 20);
        assert!(image.height() > 24 + 6);
    }

    #[test]
    fn empty_info_text_is_ignored() {
        let style = TeardropStyle {
            info_text: Some(String::new()),
            ..Default::default()
        };
        let image = compose(&style, &FontService::new(), 1.0);
        assert_eq!((image.width(), image.height()), (20, 24));
    }

    #[test]
    fn fill_color_is_used_for_the_head() {
        let style = TeardropStyle {
            fill_color: Some("#FF0000".into()),
            ..Default::default()
        };
        let image = compose(&style, &FontService::new(), 1.0);

        // Sample the drop head center: circle outline is white, but just inside the rim the
        // fill shows through.
        let offset = ((2 * image.width() + 10) * 4) as usize;
        let pixel = &image.bytes()[offset..offset + 4];
        assert_eq!(pixel, &[255, 0, 0, 255]);
    }
}
