//! Geomarker is a marker lifecycle engine for interactive map surfaces. It decides how a set of
//! geo-tagged point annotations is rendered into bitmap icons, how the annotations are aggregated
//! into region clusters, and which of the two layers is visible at the current zoom level.
//!
//! The engine does not draw a map itself. It talks to the surrounding map SDK through the
//! [`MapMarkerSink`] trait, which owns the actual marker objects and hands out opaque handles.
//! Everything else (icon composition, clustering, the zoom-driven visibility state machine) lives
//! in this crate.
//!
//! # Quick start
//!
//! ```no_run
//! use geomarker::{MarkerEngine, MarkerRecord, ClusteringOptions, ClusteringRule, ClusterBy};
//! use geomarker::image_loader::UrlImageLoader;
//! use geomarker_types::latlon;
//!
//! # fn sink() -> geomarker::sink::NullSink { geomarker::sink::NullSink::default() }
//! let mut engine = MarkerEngine::new(sink(), UrlImageLoader::new(), 2.0);
//!
//! engine.set_markers(vec![MarkerRecord::new("home", latlon!(31.23, 121.47))]);
//! engine.set_clustering_options(Some(ClusteringOptions {
//!     enabled: true,
//!     rules: vec![ClusteringRule { by: ClusterBy::City, threshold_zoom_level: 10.0 }],
//! }));
//!
//! // Call this from the map SDK's camera-change-finished callback:
//! engine.handle_camera_change(8.5);
//! ```
//!
//! # Main components
//!
//! * [`MarkerRecord`] and friends describe one annotation: coordinate, one of three icon styles
//!   (`pin`, `teardrop`, `custom`) with a per-style payload, and optional geocoding attributes
//!   used as clustering keys.
//! * [`icon::IconRenderer`] turns a style payload into a [`MarkerIcon`](icon::MarkerIcon) — either
//!   a reference to the surface's built-in pin artwork or a composed RGBA bitmap.
//! * [`MarkerEngine`] owns the canonical record set and the handle tables, and wires rendering,
//!   clustering and visibility together. All of its entry points must be called from a single
//!   sequencing context (the UI event loop of the host application).
//!
//! Rendering a `custom` style marker with a remote image is the only asynchronous operation.
//! The [`image_loader::ImageLoader`] delivers fetched bitmaps into a completion queue, and the
//! host drains it on its own context with [`MarkerEngine::process_image_completions`]. The
//! [`Messenger`] trait is how the loader asks the host to do so.

#![warn(clippy::unwrap_used)]
#![warn(missing_docs)]

pub(crate) mod async_runtime;
pub mod cluster;
mod color;
pub mod decoded_image;
mod engine;
pub mod error;
pub mod icon;
pub mod image_loader;
mod marker;
mod messenger;
pub mod sink;
mod store;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use color::Color;
pub use engine::MarkerEngine;
pub use marker::{
    ClusterBy, ClusteringOptions, ClusteringRule, CustomStyle, ImageSource, MarkerRecord,
    MarkerStyle, PinColor, PinStyle, RegionInfo, StyleKind, TeardropStyle, TextStyle,
};
pub use messenger::{DummyMessenger, Messenger};
pub use sink::MapMarkerSink;
pub use visibility::VisibilityState;

// Reexport geomarker_types
pub use geomarker_types;
