//! Turns marker style payloads into icons.
//!
//! Rendering is a pure function of the style payload (plus the loaded font data and the
//! density scale): the same payload always composes the same bitmap. The `custom` style with a
//! remote image is composed by the engine once the fetch completes; this module only ever sees
//! the already decoded bitmap.

mod canvas;
mod teardrop;
pub mod text;
mod text_bubble;

use bytes::Bytes;
use geomarker_types::Point2;

use crate::decoded_image::DecodedImage;
use crate::error::GeomarkerError;
use crate::icon::text::FontService;
use crate::marker::{CustomStyle, PinColor, PinStyle, TeardropStyle};

/// A rendered marker icon, ready to be added to the map surface.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    /// The map surface's built-in pin artwork with the given tint. No bitmap is composed for
    /// this variant; the surface owns the artwork.
    Pin(PinColor),
    /// A composed bitmap.
    Bitmap {
        /// The composed RGBA image.
        image: DecodedImage,
        /// Anchor point in relative coordinates: `(0.5, 1.0)` puts the bottom-center of the
        /// bitmap onto the marker coordinate.
        anchor: Point2,
    },
}

impl MarkerIcon {
    /// Anchor point of the icon in relative coordinates.
    pub fn anchor(&self) -> Point2 {
        match self {
            MarkerIcon::Pin(_) => Point2::new(0.5, 1.0),
            MarkerIcon::Bitmap { anchor, .. } => *anchor,
        }
    }
}

/// Renders marker icons from style payloads.
pub struct IconRenderer {
    fonts: FontService,
    scale: f32,
}

impl IconRenderer {
    /// Creates a renderer for the given density scale factor (logical units to device pixels).
    pub fn new(scale: f32) -> Self {
        Self {
            fonts: FontService::new(),
            scale: if scale > 0.0 { scale } else { 1.0 },
        }
    }

    /// Loads font data (TTF/OTF) used for label and bubble text. Without it, icons are
    /// composed with approximate text metrics and no glyphs.
    pub fn load_fonts(&mut self, fonts_data: Bytes) -> Result<(), GeomarkerError> {
        self.fonts.load_fonts(fonts_data)
    }

    /// Density scale factor the renderer was created with.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Renders the built-in pin reference.
    pub fn render_pin(&self, style: &PinStyle) -> MarkerIcon {
        MarkerIcon::Pin(style.color)
    }

    /// Composes a teardrop icon, anchored bottom-center so the tip touches the coordinate.
    pub fn render_teardrop(&self, style: &TeardropStyle) -> MarkerIcon {
        MarkerIcon::Bitmap {
            image: teardrop::compose(style, &self.fonts, self.scale),
            anchor: Point2::new(0.5, 1.0),
        }
    }

    /// Composes a text bubble icon, optionally over a fetched image, anchored at its center.
    pub fn render_text_bubble(
        &self,
        text: Option<&str>,
        style: &CustomStyle,
        image: Option<&DecodedImage>,
    ) -> MarkerIcon {
        MarkerIcon::Bitmap {
            image: text_bubble::compose(text, style, image, &self.fonts, self.scale),
            anchor: Point2::new(0.5, 0.5),
        }
    }
}
