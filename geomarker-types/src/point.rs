#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2d point on the surface of a celestial body.
///
/// Coordinates are stored as latitude and longitude in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoPoint2d {
    lat: f64,
    lon: f64,
}

impl GeoPoint2d {
    /// Creates a new point from latitude and longitude values (in degrees).
    pub fn latlon(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// Creates a new [`GeoPoint2d`] from latitude and longitude values (in degrees).
///
/// ```
/// use geomarker_types::latlon;
///
/// let point = latlon!(38.0, 52.0);
/// assert_eq!(point.lat(), 38.0);
/// ```
#[macro_export]
macro_rules! latlon {
    ($lat:expr, $lon:expr) => {
        $crate::GeoPoint2d::latlon($lat, $lon)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latlon_macro() {
        let point = latlon!(31.23, 121.47);
        assert_eq!(point.lat(), 31.23);
        assert_eq!(point.lon(), 121.47);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_from_wire_shape() {
        let point: GeoPoint2d =
            serde_json::from_str(r#"{"lat": 39.9, "lon": 116.4}"#).expect("invalid json");
        assert_eq!(point, latlon!(39.9, 116.4));
    }
}
