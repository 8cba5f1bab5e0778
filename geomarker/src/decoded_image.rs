//! This module contains utilities for loading images to be composed into marker icons.

use crate::error::GeomarkerError;

/// An image that has been loaded into memory.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    /// Raw bytes of the image, in RGBA order.
    pub(crate) bytes: Vec<u8>,
    /// Width and height of the image.
    pub(crate) dimensions: (u32, u32),
}

impl DecodedImage {
    /// Decode an image from a byte slice.
    ///
    /// Attempts to guess the format of the image from the data. Non-RGBA images
    /// will be converted to RGBA.
    pub fn decode(bytes: &[u8]) -> Result<Self, GeomarkerError> {
        use image::GenericImageView;
        let decoded = image::load_from_memory(bytes)?;
        let bytes = decoded.to_rgba8();
        let dimensions = decoded.dimensions();

        Ok(Self {
            bytes: bytes.into_vec(),
            dimensions,
        })
    }

    /// Creates an image from a raw RGBA buffer.
    ///
    /// Returns an error if the buffer length does not match the dimensions.
    pub fn from_rgba(bytes: Vec<u8>, width: u32, height: u32) -> Result<Self, GeomarkerError> {
        // Length check in u128: the product can overflow both u32 and u64.
        if bytes.len() as u128 != width as u128 * height as u128 * 4 {
            return Err(GeomarkerError::Generic(format!(
                "rgba buffer of {} bytes does not match {width}x{height} dimensions",
                bytes.len()
            )));
        }

        Ok(Self {
            bytes,
            dimensions: (width, height),
        })
    }

    /// Width of the image in pixels.
    pub fn width(&self) -> u32 {
        self.dimensions.0
    }

    /// Height of the image in pixels.
    pub fn height(&self) -> u32 {
        self.dimensions.1
    }

    /// Raw RGBA bytes of the image.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn from_rgba_validates_dimensions() {
        let image = DecodedImage::from_rgba(vec![0; 16], 2, 2).expect("valid buffer");
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 2);

        assert_matches!(
            DecodedImage::from_rgba(vec![0; 15], 2, 2),
            Err(GeomarkerError::Generic(_))
        );
    }

    #[test]
    fn from_rgba_rejects_oversized_dimensions_without_overflow() {
        // 65536 * 65536 * 4 wraps to 0 in u32; the mismatch must still be detected.
        assert_matches!(
            DecodedImage::from_rgba(Vec::new(), 65536, 65536),
            Err(GeomarkerError::Generic(_))
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_matches!(
            DecodedImage::decode(&[0, 1, 2, 3]),
            Err(GeomarkerError::ImageDecode(_))
        );
    }
}
