use std::sync::Arc;

use parking_lot::Mutex;

use crate::cluster::{self, ClusterMarker};
use crate::decoded_image::DecodedImage;
use crate::error::GeomarkerError;
use crate::icon::{IconRenderer, MarkerIcon};
use crate::image_loader::ImageLoader;
use crate::marker::{ClusterBy, ClusteringOptions, CustomStyle, MarkerRecord, MarkerStyle, StyleKind};
use crate::messenger::Messenger;
use crate::sink::{MapMarkerSink, MarkerOptions};
use crate::store::{Generation, MarkerStore};
use crate::visibility::{self, VisibilityState};

/// A raw marker handle together with the style it was rendered from.
struct RawHandle<H> {
    handle: H,
    style: StyleKind,
}

/// A cluster marker handle together with the rule key it belongs to.
struct ClusterHandle<H> {
    handle: H,
    by: ClusterBy,
}

/// A finished image fetch waiting to be applied on the engine's sequencing context.
struct FetchCompletion {
    generation: Generation,
    record: MarkerRecord,
    image: Option<DecodedImage>,
}

type CompletionQueue = Arc<Mutex<Vec<FetchCompletion>>>;

/// The marker lifecycle engine.
///
/// Owns the canonical record set and the handle tables, and wires icon rendering, region
/// clustering and zoom-driven visibility together on top of a [`MapMarkerSink`].
///
/// All entry points must be called from a single sequencing context (the host UI event loop);
/// the engine assumes single-writer access to its state. The only asynchronous operation is
/// the image fetch for `custom` style markers: its completion is parked in an internal queue
/// and applied when the host calls [`process_image_completions`](Self::process_image_completions).
pub struct MarkerEngine<S: MapMarkerSink, L: ImageLoader> {
    sink: S,
    loader: L,
    renderer: IconRenderer,
    store: MarkerStore,
    clustering: Option<ClusteringOptions>,
    raw_handles: Vec<RawHandle<S::Handle>>,
    cluster_handles: Vec<ClusterHandle<S::Handle>>,
    completions: CompletionQueue,
    messenger: Option<Arc<dyn Messenger>>,
    state: VisibilityState,
}

impl<S: MapMarkerSink, L: ImageLoader> MarkerEngine<S, L> {
    /// Creates an engine rendering icons at the given density scale factor.
    pub fn new(sink: S, loader: L, scale: f32) -> Self {
        Self {
            sink,
            loader,
            renderer: IconRenderer::new(scale),
            store: MarkerStore::new(),
            clustering: None,
            raw_handles: Vec::new(),
            cluster_handles: Vec::new(),
            completions: Arc::new(Mutex::new(Vec::new())),
            messenger: None,
            state: VisibilityState::NoClustering,
        }
    }

    /// Sets the messenger used to ask the host for a turn when an image fetch completes.
    pub fn set_messenger(&mut self, messenger: impl Messenger + 'static) {
        self.messenger = Some(Arc::new(messenger));
    }

    /// Loads font data used for label and bubble text.
    pub fn load_fonts(&mut self, fonts_data: bytes::Bytes) -> Result<(), GeomarkerError> {
        self.renderer.load_fonts(fonts_data)
    }

    /// The map surface the engine renders into.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Records of the current generation.
    pub fn markers(&self) -> &[MarkerRecord] {
        self.store.records()
    }

    /// The current clustering configuration.
    pub fn clustering_options(&self) -> Option<&ClusteringOptions> {
        self.clustering.as_ref()
    }

    /// The visibility state after the last performed transition.
    pub fn visibility_state(&self) -> VisibilityState {
        self.state
    }

    /// Replaces the whole marker set.
    ///
    /// All previously added raw handles are removed before any new marker is created, so the
    /// caller never observes a mix of the old and the new set. Records are stored verbatim.
    /// Markers that need a remote image are added once their fetch completion is pumped;
    /// everything else is added synchronously. Ends with a full cluster recomputation.
    pub fn set_markers(&mut self, records: Vec<MarkerRecord>) {
        for raw in std::mem::take(&mut self.raw_handles) {
            self.sink.remove_marker(&raw.handle);
        }

        let generation = self.store.replace_all(records);

        for record in self.store.records().to_vec() {
            let icon = match &record.style {
                MarkerStyle::Pin(style) => self.renderer.render_pin(style),
                MarkerStyle::Teardrop(style) => self.renderer.render_teardrop(style),
                MarkerStyle::Custom(style) => {
                    if let Some(source) = &style.image {
                        // The synchronous path is skipped entirely; the marker is added when
                        // the completion fires with the composed icon.
                        self.start_image_fetch(generation, record.clone(), &source.url);
                        continue;
                    }
                    self.renderer
                        .render_text_bubble(record.bubble_text(), style, None)
                }
            };

            self.add_raw(record, icon);
        }

        self.recompute_clusters();
    }

    /// Replaces the clustering configuration and rebuilds all cluster layers.
    pub fn set_clustering_options(&mut self, options: Option<ClusteringOptions>) {
        self.clustering = options;
        self.recompute_clusters();
    }

    /// Re-runs the visibility state machine for the final zoom of a camera change.
    pub fn handle_camera_change(&mut self, zoom: f64) {
        self.apply_visibility(zoom);
    }

    /// Applies finished image fetches on the caller's sequencing context.
    ///
    /// Completions belonging to a superseded record generation are discarded: a fetch that
    /// outlives its `set_markers` call must not resurrect a removed marker.
    pub fn process_image_completions(&mut self) {
        let drained = std::mem::take(&mut *self.completions.lock());

        let mut added = false;
        for completion in drained {
            if completion.generation != self.store.generation() {
                log::debug!(
                    "Discarding stale image completion for marker {:?}",
                    completion.record.id
                );
                continue;
            }

            let MarkerStyle::Custom(style) = &completion.record.style else {
                continue;
            };

            // A failed fetch still produces the text-only bubble.
            let icon = self.renderer.render_text_bubble(
                completion.record.bubble_text(),
                style,
                completion.image.as_ref(),
            );
            self.add_raw(completion.record.clone(), icon);
            added = true;
        }

        if added {
            let zoom = self.sink.current_zoom();
            self.apply_visibility(zoom);
        }
    }

    fn start_image_fetch(&self, generation: Generation, record: MarkerRecord, url: &str) {
        let queue = self.completions.clone();
        let messenger = self.messenger.clone();

        self.loader.load(
            url,
            Box::new(move |image| {
                queue.lock().push(FetchCompletion {
                    generation,
                    record,
                    image,
                });
                if let Some(messenger) = messenger {
                    messenger.request_redraw();
                }
            }),
        );
    }

    fn add_raw(&mut self, record: MarkerRecord, icon: MarkerIcon) {
        let style = record.style.kind();
        let options = MarkerOptions {
            position: record.coordinate,
            icon,
            title: record.title,
            subtitle: record.subtitle,
            marker_id: Some(record.id),
        };

        match self.sink.add_marker(options) {
            Some(handle) => self.raw_handles.push(RawHandle { handle, style }),
            // A rejected add is swallowed: the marker is simply absent.
            None => log::debug!("Map surface rejected a raw marker"),
        }
    }

    /// Rebuilds every cluster layer from the current records and configuration.
    ///
    /// Cluster handles are never mutated in place: the previous set is fully removed and a new
    /// one is created, then visibility is re-applied at the sink's current zoom so the new
    /// handles do not wait for a camera event.
    fn recompute_clusters(&mut self) {
        for cluster in std::mem::take(&mut self.cluster_handles) {
            self.sink.remove_marker(&cluster.handle);
        }

        let clusters = cluster::build_clusters(self.store.records(), self.clustering.as_ref());
        for cluster in clusters {
            self.add_cluster(cluster);
        }

        let zoom = self.sink.current_zoom();
        self.apply_visibility(zoom);
    }

    fn add_cluster(&mut self, cluster: ClusterMarker) {
        let icon = self
            .renderer
            .render_text_bubble(Some(&cluster.label), &CustomStyle::default(), None);
        let options = MarkerOptions {
            position: cluster.position,
            icon,
            title: None,
            subtitle: None,
            marker_id: None,
        };

        match self.sink.add_marker(options) {
            Some(handle) => self.cluster_handles.push(ClusterHandle {
                handle,
                by: cluster.by,
            }),
            None => log::debug!("Map surface rejected a cluster marker"),
        }
    }

    fn apply_visibility(&mut self, zoom: f64) {
        // Disabled clustering performs no transition: visibility is left exactly as it is.
        let Some(state) = visibility::resolve(zoom, self.clustering.as_ref()) else {
            return;
        };
        self.state = state;

        match state {
            VisibilityState::NoClustering => {
                for cluster in &self.cluster_handles {
                    self.sink.set_visible(&cluster.handle, false);
                }
                for raw in &self.raw_handles {
                    self.sink.set_visible(&raw.handle, true);
                }
            }
            VisibilityState::ClusteredBy(active) => {
                for cluster in &self.cluster_handles {
                    self.sink.set_visible(&cluster.handle, cluster.by == active);
                }
                for raw in &self.raw_handles {
                    // Custom overlays stay visible in every state.
                    let visible = raw.style == StyleKind::Custom;
                    self.sink.set_visible(&raw.handle, visible);
                }
            }
        }
    }
}
