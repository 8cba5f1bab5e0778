//! The boundary to the live map surface.
//!
//! The engine never draws a map. It hands rendered icons to a [`MapMarkerSink`] owned by the
//! surrounding map SDK, and gets back opaque handles that it uses to toggle visibility or
//! remove markers later. The sink is always accessed from the single sequencing context the
//! engine itself runs on.

use geomarker_types::GeoPoint2d;
use maybe_sync::{MaybeSend, MaybeSync};

use crate::icon::MarkerIcon;

/// Everything the surface needs to create one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerOptions {
    /// Geographic position of the marker.
    pub position: GeoPoint2d,
    /// Rendered icon, including its anchor point.
    pub icon: MarkerIcon,
    /// Title for the marker callout.
    pub title: Option<String>,
    /// Subtitle for the marker callout.
    pub subtitle: Option<String>,
    /// Application-defined id, reported back on tap events. `None` for cluster markers.
    pub marker_id: Option<String>,
}

/// A map surface that can hold rendered markers.
///
/// The surface is expected to notify the host about camera changes; the host forwards the
/// final zoom of each change to [`MarkerEngine::handle_camera_change`](crate::MarkerEngine::handle_camera_change).
pub trait MapMarkerSink: MaybeSend + MaybeSync {
    /// Opaque reference to a marker owned by the surface.
    type Handle: Clone + MaybeSend + MaybeSync;

    /// Adds a marker to the surface. A surface may reject the marker by returning `None`; the
    /// engine treats that as the marker simply being absent.
    fn add_marker(&mut self, options: MarkerOptions) -> Option<Self::Handle>;

    /// Removes a previously added marker.
    fn remove_marker(&mut self, handle: &Self::Handle);

    /// Shows or hides a previously added marker.
    fn set_visible(&mut self, handle: &Self::Handle, visible: bool);

    /// The current camera zoom level.
    fn current_zoom(&self) -> f64;
}

/// A sink that discards everything. Useful for tests and doc examples.
#[derive(Debug, Default)]
pub struct NullSink {
    added: usize,
}

impl MapMarkerSink for NullSink {
    type Handle = usize;

    fn add_marker(&mut self, _options: MarkerOptions) -> Option<Self::Handle> {
        self.added += 1;
        Some(self.added)
    }

    fn remove_marker(&mut self, _handle: &Self::Handle) {}

    fn set_visible(&mut self, _handle: &Self::Handle, _visible: bool) {}

    fn current_zoom(&self) -> f64 {
        0.0
    }
}
