//! Error types used by the crate.

use image::ImageError;
use thiserror::Error;

/// Geomarker error type.
#[derive(Debug, Error)]
pub enum GeomarkerError {
    /// I/O error (network or file)
    #[error("failed to load data")]
    Io,
    /// Image decoding error.
    #[error("image decode error: {0:?}")]
    ImageDecode(#[from] ImageError),
    /// Font data could not be parsed.
    #[error("invalid font data: {0}")]
    FontData(String),
    /// Generic error - details are inside.
    #[error("{0}")]
    Generic(String),
}

impl From<reqwest::Error> for GeomarkerError {
    fn from(_value: reqwest::Error) -> Self {
        Self::Io
    }
}
