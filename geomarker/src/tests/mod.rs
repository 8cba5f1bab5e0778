use std::sync::Arc;

use parking_lot::Mutex;

use crate::decoded_image::DecodedImage;
use crate::image_loader::{ImageCallback, ImageLoader};
use crate::sink::{MapMarkerSink, MarkerOptions};

/// A marker held by [`TestSink`].
pub struct TestMarker {
    pub options: MarkerOptions,
    pub visible: bool,
}

#[derive(Default)]
pub struct TestSurfaceState {
    pub markers: Vec<(u64, TestMarker)>,
    pub zoom: f64,
    next_handle: u64,
}

impl TestSurfaceState {
    pub fn visible_count(&self) -> usize {
        self.markers.iter().filter(|(_, m)| m.visible).count()
    }

    pub fn marker_ids(&self) -> Vec<Option<String>> {
        self.markers
            .iter()
            .map(|(_, m)| m.options.marker_id.clone())
            .collect()
    }
}

/// A sink that records every surface operation, sharing its state with the test body.
#[derive(Clone)]
pub struct TestSink {
    pub state: Arc<Mutex<TestSurfaceState>>,
    /// When set, all `add_marker` calls are rejected.
    pub reject_adds: Arc<Mutex<bool>>,
}

impl TestSink {
    pub fn new(zoom: f64) -> Self {
        let state = TestSurfaceState {
            zoom,
            ..Default::default()
        };
        Self {
            state: Arc::new(Mutex::new(state)),
            reject_adds: Arc::new(Mutex::new(false)),
        }
    }
}

impl MapMarkerSink for TestSink {
    type Handle = u64;

    fn add_marker(&mut self, options: MarkerOptions) -> Option<Self::Handle> {
        if *self.reject_adds.lock() {
            return None;
        }

        let mut state = self.state.lock();
        state.next_handle += 1;
        let handle = state.next_handle;
        state.markers.push((
            handle,
            TestMarker {
                options,
                visible: true,
            },
        ));
        Some(handle)
    }

    fn remove_marker(&mut self, handle: &Self::Handle) {
        self.state.lock().markers.retain(|(h, _)| h != handle);
    }

    fn set_visible(&mut self, handle: &Self::Handle, visible: bool) {
        let mut state = self.state.lock();
        for (h, marker) in &mut state.markers {
            if h == handle {
                marker.visible = visible;
            }
        }
    }

    fn current_zoom(&self) -> f64 {
        self.state.lock().zoom
    }
}

/// A loader that parks every request until the test completes it by hand.
#[derive(Clone, Default)]
pub struct TestLoader {
    pending: Arc<Mutex<Vec<(String, ImageCallback)>>>,
}

impl TestLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_urls(&self) -> Vec<String> {
        self.pending.lock().iter().map(|(url, _)| url.clone()).collect()
    }

    /// Completes all parked requests with a copy of the given result.
    pub fn complete_all(&self, image: Option<DecodedImage>) {
        let parked = std::mem::take(&mut *self.pending.lock());
        for (_, callback) in parked {
            callback(image.clone());
        }
    }
}

impl ImageLoader for TestLoader {
    fn load(&self, url: &str, callback: ImageCallback) {
        self.pending.lock().push((url.to_string(), callback));
    }
}

pub fn test_image(width: u32, height: u32) -> DecodedImage {
    DecodedImage::from_rgba(vec![255; (width * height * 4) as usize], width, height)
        .expect("valid buffer")
}
