//! Loading of remote images for `custom` style markers.

use std::sync::Arc;

use maybe_sync::{MaybeSend, MaybeSync};
use quick_cache::sync::Cache;

use crate::decoded_image::DecodedImage;
use crate::error::GeomarkerError;

/// Completion callback of an image fetch. Receives `None` when the fetch or decode failed;
/// the marker is then composed without the image rather than dropped.
pub type ImageCallback = Box<dyn FnOnce(Option<DecodedImage>) + Send + 'static>;

/// Fire-and-forget image fetching. There is no cancellation token: superseded fetches are
/// filtered out by the engine's generation check when their completions are pumped.
pub trait ImageLoader: MaybeSend + MaybeSync {
    /// Starts loading the image and eventually invokes `callback` exactly once.
    fn load(&self, url: &str, callback: ImageCallback);
}

const CACHE_CAPACITY: usize = 256;

/// Loads images over HTTP, keeping decoded bitmaps in an in-memory cache.
///
/// Fetches are spawned on the ambient tokio runtime; completion callbacks run on the runtime's
/// context, so they must only hand data over (the engine's completion queue does exactly
/// that), never touch the sink directly.
pub struct UrlImageLoader {
    http_client: reqwest::Client,
    cache: Arc<Cache<String, DecodedImage>>,
}

impl UrlImageLoader {
    /// Creates a loader with the default HTTP client configuration.
    pub fn new() -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent("geomarker/0.1")
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            cache: Arc::new(Cache::new(CACHE_CAPACITY)),
        }
    }

    async fn fetch(client: reqwest::Client, url: &str) -> Result<DecodedImage, GeomarkerError> {
        log::info!("Loading {url}");
        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            log::info!("Failed to load {url}: {}", response.status());
            return Err(GeomarkerError::Io);
        }

        let bytes = response.bytes().await?;
        DecodedImage::decode(&bytes)
    }
}

impl Default for UrlImageLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageLoader for UrlImageLoader {
    fn load(&self, url: &str, callback: ImageCallback) {
        if let Some(image) = self.cache.get(url) {
            callback(Some(image));
            return;
        }

        let client = self.http_client.clone();
        let cache = self.cache.clone();
        let url = url.to_string();

        crate::async_runtime::spawn(async move {
            match Self::fetch(client, &url).await {
                Ok(image) => {
                    cache.insert(url, image.clone());
                    callback(Some(image));
                }
                Err(error) => {
                    log::warn!("Image fetch for {url} failed: {error}");
                    callback(None);
                }
            }
        });
    }
}
