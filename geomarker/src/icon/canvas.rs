//! CPU raster primitives used to compose marker icons.
//!
//! Icons are small (tens of pixels), so everything here is a straightforward per-pixel
//! coverage computation with 2x2 supersampling for the curved edges. No tessellation,
//! no GPU involvement.

use crate::color::Color;
use crate::decoded_image::DecodedImage;

/// Axis-aligned rectangle in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    fn center(&self) -> (f32, f32) {
        (
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }
}

/// An RGBA drawing surface of fixed pixel size.
pub(crate) struct Canvas {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

/// Offsets of the 2x2 supersampling grid within a pixel.
const SAMPLES: [(f32, f32); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

/// Largest canvas edge in pixels. Style payloads come from application code, so an absurd
/// explicit size must degrade to a clamped bitmap instead of an unbounded allocation.
const MAX_DIMENSION: u32 = 2048;

impl Canvas {
    /// Creates a fully transparent canvas. Dimensions are clamped to `1..=MAX_DIMENSION` so
    /// that a degenerate or oversized icon still produces a valid bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.clamp(1, MAX_DIMENSION);
        let height = height.clamp(1, MAX_DIMENSION);
        Self {
            bytes: vec![0; width as usize * height as usize * 4],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Consumes the canvas producing the composed image.
    pub fn into_image(self) -> DecodedImage {
        DecodedImage {
            bytes: self.bytes,
            dimensions: (self.width, self.height),
        }
    }

    /// Blends `color` over the pixel at `(x, y)` scaled by `coverage` in `0.0..=1.0`.
    pub fn blend_coverage(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let alpha = (color.a() as f32 * coverage.clamp(0.0, 1.0)) as u8;
        if alpha == 0 {
            return;
        }

        let offset = ((y as u32 * self.width + x as u32) * 4) as usize;
        let base = Color::rgba(
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        );
        let blended = base.blend(color.with_alpha(alpha));
        self.bytes[offset..offset + 4].copy_from_slice(&blended.to_u8_array());
    }

    /// Fills a shape given by its pixel-containment test, supersampled over the given bounds.
    fn fill_shape(&mut self, bounds: Rect, color: Color, contains: impl Fn(f32, f32) -> bool) {
        let x0 = bounds.left.floor().max(0.0) as i64;
        let y0 = bounds.top.floor().max(0.0) as i64;
        let x1 = (bounds.right.ceil() as i64).min(self.width as i64);
        let y1 = (bounds.bottom.ceil() as i64).min(self.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let mut hits = 0;
                for (dx, dy) in SAMPLES {
                    if contains(x as f32 + dx, y as f32 + dy) {
                        hits += 1;
                    }
                }
                if hits > 0 {
                    self.blend_coverage(x, y, color, hits as f32 / SAMPLES.len() as f32);
                }
            }
        }
    }

    /// Fills a rectangle with rounded corners.
    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        let radius = radius
            .min(rect.width() / 2.0)
            .min(rect.height() / 2.0)
            .max(0.0);
        self.fill_shape(rect, color, |x, y| {
            rounded_rect_distance(rect, radius, x, y) <= 0.0
        });
    }

    /// Strokes the outline of a rectangle with rounded corners.
    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, line_width: f32, color: Color) {
        let radius = radius
            .min(rect.width() / 2.0)
            .min(rect.height() / 2.0)
            .max(0.0);
        let half = line_width / 2.0;
        let bounds = Rect::new(
            rect.left - half,
            rect.top - half,
            rect.right + half,
            rect.bottom + half,
        );
        self.fill_shape(bounds, color, |x, y| {
            rounded_rect_distance(rect, radius, x, y).abs() <= half
        });
    }

    /// Strokes the outline of a circle.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, line_width: f32, color: Color) {
        let half = line_width / 2.0;
        let outer = radius + half;
        let bounds = Rect::new(cx - outer, cy - outer, cx + outer, cy + outer);
        self.fill_shape(bounds, color, |x, y| {
            ((x - cx).hypot(y - cy) - radius).abs() <= half
        });
    }

    /// Fills a teardrop silhouette inscribed into `rect`: a circular head spanning the full
    /// width, and a tail tapering to a tip at the bottom-center.
    pub fn fill_teardrop(&mut self, rect: Rect, color: Color) {
        let radius = rect.width() / 2.0;
        let (cx, _) = rect.center();
        let cy = rect.top + radius;
        let tip = rect.bottom;

        self.fill_shape(rect, color, |x, y| {
            if (x - cx).hypot(y - cy) <= radius {
                return true;
            }
            if y < cy || y > tip || tip <= cy {
                return false;
            }
            let half_width = radius * (tip - y) / (tip - cy);
            (x - cx).abs() <= half_width
        });
    }

    /// Draws `src` scaled into the destination rectangle with nearest-neighbor sampling.
    pub fn draw_image(&mut self, src: &DecodedImage, dst: Rect) {
        if dst.width() <= 0.0 || dst.height() <= 0.0 || src.width() == 0 || src.height() == 0 {
            return;
        }

        let x0 = dst.left.floor().max(0.0) as i64;
        let y0 = dst.top.floor().max(0.0) as i64;
        let x1 = (dst.right.ceil() as i64).min(self.width as i64);
        let y1 = (dst.bottom.ceil() as i64).min(self.height as i64);

        for y in y0..y1 {
            for x in x0..x1 {
                let u = ((x as f32 + 0.5 - dst.left) / dst.width() * src.width() as f32) as i64;
                let v = ((y as f32 + 0.5 - dst.top) / dst.height() * src.height() as f32) as i64;
                let u = u.clamp(0, src.width() as i64 - 1) as u32;
                let v = v.clamp(0, src.height() as i64 - 1) as u32;

                let offset = ((v * src.width() + u) * 4) as usize;
                let pixel = &src.bytes()[offset..offset + 4];
                self.blend_coverage(
                    x,
                    y,
                    Color::rgba(pixel[0], pixel[1], pixel[2], pixel[3]),
                    1.0,
                );
            }
        }
    }
}

/// Signed distance from `(x, y)` to the border of a rounded rectangle. Negative inside.
fn rounded_rect_distance(rect: Rect, radius: f32, x: f32, y: f32) -> f32 {
    let (cx, cy) = ((rect.left + rect.right) / 2.0, (rect.top + rect.bottom) / 2.0);
    let half_w = rect.width() / 2.0 - radius;
    let half_h = rect.height() / 2.0 - radius;

    let dx = ((x - cx).abs() - half_w).max(0.0);
    let dy = ((y - cy).abs() - half_h).max(0.0);
    dx.hypot(dy) - radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(image: &DecodedImage, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * image.width() + x) * 4) as usize;
        image.bytes()[offset..offset + 4]
            .try_into()
            .expect("pixel out of bounds")
    }

    #[test]
    fn degenerate_canvas_is_one_pixel() {
        let canvas = Canvas::new(0, 0);
        assert_eq!((canvas.width(), canvas.height()), (1, 1));
    }

    #[test]
    fn oversized_canvas_is_clamped() {
        // The byte length must be computed in usize: 100_000 * 100_000 * 4 overflows u32.
        let canvas = Canvas::new(100_000, 2);
        assert_eq!((canvas.width(), canvas.height()), (MAX_DIMENSION, 2));

        let huge = Canvas::new(u32::MAX, u32::MAX);
        assert_eq!((huge.width(), huge.height()), (MAX_DIMENSION, MAX_DIMENSION));
    }

    #[test]
    fn teardrop_tip_touches_bottom_center() {
        let mut canvas = Canvas::new(20, 24);
        canvas.fill_teardrop(Rect::new(0.0, 0.0, 20.0, 24.0), Color::BLUE);
        let image = canvas.into_image();

        // Head center is solid, tip pixel has some coverage, bottom corners have none.
        assert_eq!(pixel(&image, 10, 10), [0, 0, 255, 255]);
        assert!(pixel(&image, 10, 22)[3] > 0);
        assert_eq!(pixel(&image, 0, 23), [0, 0, 0, 0]);
        assert_eq!(pixel(&image, 19, 23), [0, 0, 0, 0]);
    }

    #[test]
    fn rounded_rect_clips_corners() {
        let mut canvas = Canvas::new(30, 20);
        canvas.fill_rounded_rect(Rect::new(0.0, 0.0, 30.0, 20.0), 8.0, Color::GREEN);
        let image = canvas.into_image();

        assert_eq!(pixel(&image, 15, 10), [0, 255, 0, 255]);
        assert_eq!(pixel(&image, 0, 0), [0, 0, 0, 0]);
    }

    #[test]
    fn draw_image_scales_source() {
        let src = DecodedImage::from_rgba(vec![255; 4], 1, 1).expect("valid image");
        let mut canvas = Canvas::new(4, 4);
        canvas.draw_image(&src, Rect::new(0.0, 0.0, 4.0, 4.0));
        let image = canvas.into_image();

        assert_eq!(pixel(&image, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&image, 3, 3), [255, 255, 255, 255]);
    }
}
