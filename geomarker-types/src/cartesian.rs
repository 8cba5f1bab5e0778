#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 2d cartesian point or offset in logical (density-independent) units.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point2 {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    pub y: f64,
}

impl Point2 {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Size of a rectangular area in logical (density-independent) units.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width of the area.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Height of the area.
    pub fn height(&self) -> f64 {
        self.height
    }
}
