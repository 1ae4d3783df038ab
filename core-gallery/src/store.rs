//! # Image Store
//!
//! Observable in-memory holder of the fetched image list plus its loading and
//! error flags.
//!
//! ## State
//!
//! | Field     | Meaning                                                    |
//! |-----------|------------------------------------------------------------|
//! | `images`  | Records in server response order; replaced wholesale       |
//! | `loading` | `true` only between the start and completion of a fetch    |
//! | `error`   | Message of the last failed fetch, cleared when one starts  |
//!
//! A failed fetch never touches `images`, so stale records stay visible next
//! to the error message.
//!
//! ## Observing
//!
//! - [`ImageStore::subscribe`] returns a `watch` receiver that is notified on
//!   every state write (including the synchronous `loading = true`).
//! - [`ImageStore::events`] returns a broadcast receiver of [`GalleryEvent`]
//!   transitions.
//!
//! ## Overlapping fetches
//!
//! Calls are not deduplicated or cancelled. Each fetch writes its own result
//! when it completes, so the last one to complete wins, and the first one to
//! complete already sets `loading = false`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_gallery::ImageStore;
//!
//! let store = ImageStore::with_defaults()?;
//! store.fetch_images().await;
//!
//! if let Some(message) = store.error() {
//!     eprintln!("could not load images: {}", message);
//! }
//! let first = store.get_image_by_id("0");
//! ```

use crate::api::ImageApi;
use crate::error::{GalleryError, Result};
use crate::models::ImageRecord;
use core_runtime::config::GalleryConfig;
use core_runtime::events::{EventBus, GalleryEvent, Receiver};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info};

/// Error message recorded when a failure carries no description of its own.
pub const FALLBACK_ERROR_MESSAGE: &str = "Failed to fetch images";

/// Snapshot of the store's observable state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageStoreState {
    pub images: Arc<Vec<ImageRecord>>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ImageStoreState {
    /// First record whose identifier equals `id`.
    pub fn find(&self, id: &str) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.id == id)
    }
}

/// Observable image list store.
///
/// Cloning yields another handle to the same state.
#[derive(Clone)]
pub struct ImageStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    api: ImageApi,
    state: watch::Sender<ImageStoreState>,
    events: EventBus,
}

impl ImageStore {
    /// Creates an empty store that fetches through `api`.
    pub fn new(api: ImageApi) -> Self {
        Self::with_event_bus(api, EventBus::default())
    }

    /// Creates an empty store that publishes its transitions on `events`.
    pub fn with_event_bus(api: ImageApi, events: EventBus) -> Self {
        let (state, _) = watch::channel(ImageStoreState::default());
        Self {
            inner: Arc::new(StoreInner { api, state, events }),
        }
    }

    /// Creates an empty store from a validated configuration.
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self::with_event_bus(
            ImageApi::from_config(config),
            EventBus::new(config.event_buffer_size),
        )
    }

    /// Creates a store for the default endpoint using the platform HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::Config`] when no platform default transport is
    /// compiled in (the `desktop-shims` feature is disabled).
    pub fn with_defaults() -> Result<Self> {
        let config = GalleryConfig::builder().build()?;
        Ok(Self::from_config(&config))
    }

    /// Fetches the image list and replaces the stored collection.
    ///
    /// `loading` is set and `error` cleared as soon as this is called, before
    /// the returned future is first polled. The future never fails: outcomes
    /// are recorded in the store's state, so inspect [`error`](Self::error)
    /// afterwards. It owns a handle to the store and may be spawned.
    pub fn fetch_images(&self) -> impl Future<Output = ()> + Send + 'static {
        self.inner.begin_fetch();
        let inner = Arc::clone(&self.inner);
        async move { inner.complete_fetch().await }
    }

    /// First record in the current collection whose identifier equals `id`.
    pub fn get_image_by_id(&self, id: &str) -> Option<ImageRecord> {
        self.inner.state.borrow().find(id).cloned()
    }

    /// Current collection, shared with every other reader.
    pub fn images(&self) -> Arc<Vec<ImageRecord>> {
        Arc::clone(&self.inner.state.borrow().images)
    }

    /// Whether a fetch is currently in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    /// Message of the last failed fetch, if any.
    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    /// Copy of the whole state, taken atomically.
    pub fn snapshot(&self) -> ImageStoreState {
        self.inner.state.borrow().clone()
    }

    /// Number of records in the current collection.
    pub fn len(&self) -> usize {
        self.inner.state.borrow().images.len()
    }

    /// Whether the current collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Endpoint this store fetches from.
    pub fn endpoint(&self) -> &str {
        self.inner.api.endpoint()
    }

    /// Receiver notified on every state write.
    pub fn subscribe(&self) -> watch::Receiver<ImageStoreState> {
        self.inner.state.subscribe()
    }

    /// Receiver of fetch lifecycle events.
    pub fn events(&self) -> Receiver<GalleryEvent> {
        self.inner.events.subscribe()
    }
}

impl std::fmt::Debug for ImageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("ImageStore")
            .field("endpoint", &self.inner.api.endpoint())
            .field("images", &state.images.len())
            .field("loading", &state.loading)
            .field("error", &state.error)
            .finish()
    }
}

impl StoreInner {
    fn begin_fetch(&self) {
        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        debug!(endpoint = %self.api.endpoint(), "Fetching images");
        self.events
            .emit(GalleryEvent::FetchStarted {
                endpoint: self.api.endpoint().to_string(),
            })
            .ok();
    }

    async fn complete_fetch(&self) {
        match self.api.list_images().await {
            Ok(images) => {
                let count = images.len();
                self.state.send_modify(|state| {
                    state.images = Arc::new(images);
                    state.loading = false;
                });

                info!(endpoint = %self.api.endpoint(), count, "Fetched images");
                self.events
                    .emit(GalleryEvent::FetchSucceeded {
                        endpoint: self.api.endpoint().to_string(),
                        count,
                    })
                    .ok();
            }
            Err(err) => {
                let message = error_message(&err);
                self.state.send_modify(|state| {
                    state.error = Some(message.clone());
                    state.loading = false;
                });

                error!(
                    endpoint = %self.api.endpoint(),
                    status = err.status(),
                    error = %message,
                    "Error fetching images"
                );
                self.events
                    .emit(GalleryEvent::FetchFailed {
                        endpoint: self.api.endpoint().to_string(),
                        message,
                        status: err.status(),
                    })
                    .ok();
            }
        }
    }
}

fn error_message(err: &GalleryError) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}
