//! Geographic and cartesian primitives used by the `geomarker` engine.
//!
//! The crate is intentionally small: a geographic point type with a
//! construction macro, and the couple of cartesian types (offsets and
//! logical sizes) that marker styling needs. Everything is plain data
//! and serde-enabled behind the default-on `serde` feature.

mod cartesian;
mod point;

pub use cartesian::{Point2, Size};
pub use point::GeoPoint2d;
