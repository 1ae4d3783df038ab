//! Workspace facade crate.
//!
//! Re-exports the gallery store and its runtime so host applications can
//! depend on `gallery-workspace` alone. The `desktop-shims` feature (on by
//! default) wires in the reqwest-backed HTTP client as the default transport.

pub use core_gallery::{
    GalleryError, ImageApi, ImageRecord, ImageStore, ImageStoreState, FALLBACK_ERROR_MESSAGE,
};
pub use core_runtime::config::{GalleryConfig, DEFAULT_IMAGE_LIST_ENDPOINT};
pub use core_runtime::events::{EventBus, GalleryEvent};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
