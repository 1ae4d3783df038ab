//! # Gallery Configuration
//!
//! Provides configuration for the gallery core.
//!
//! ## Overview
//!
//! A builder assembles a [`GalleryConfig`] holding the injected HTTP bridge
//! and the few settings the image store needs. `build()` validates eagerly so
//! a bad endpoint is reported at startup rather than on the first fetch.
//!
//! ## Required Dependencies
//!
//! - `HttpClient` - injected by the host. When the `desktop-shims` feature is
//!   enabled a `ReqwestHttpClient` is provided automatically if none is set.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::GalleryConfig;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let config = GalleryConfig::builder()
//!     .http_client(Arc::new(MyHttpClient))
//!     .endpoint("https://picsum.photos/v2/list")
//!     .request_timeout(Duration::from_secs(15))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::HttpClient;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Upstream list endpoint used when none is configured.
pub const DEFAULT_IMAGE_LIST_ENDPOINT: &str = "https://picsum.photos/v2/list";

/// Configuration for the gallery core.
///
/// Use [`GalleryConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct GalleryConfig {
    /// URL the image list is fetched from with a single GET
    pub endpoint: String,

    /// HTTP client used for the request
    pub http_client: Arc<dyn HttpClient>,

    /// Per-request timeout. `None` leaves the transport's own default in place.
    pub request_timeout: Option<Duration>,

    /// `User-Agent` header override
    pub user_agent: Option<String>,

    /// Capacity of the store's event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for GalleryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GalleryConfig")
            .field("endpoint", &self.endpoint)
            .field("http_client", &"HttpClient { ... }")
            .field("request_timeout", &self.request_timeout)
            .field("user_agent", &self.user_agent)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl GalleryConfig {
    /// Creates a new builder for constructing a `GalleryConfig`.
    pub fn builder() -> GalleryConfigBuilder {
        GalleryConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Endpoint is an absolute `http`/`https` URL
    /// - Event buffer size is non-zero
    /// - Request timeout, if set, is non-zero
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config("Endpoint cannot be empty".to_string()));
        }

        let url = Url::parse(endpoint).map_err(|e| {
            Error::Config(format!(
                "Endpoint must be an absolute http(s) URL, got '{}': {}",
                self.endpoint, e
            ))
        })?;
        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if !matches!(url.scheme(), "http" | "https") || !has_host {
            return Err(Error::Config(format!(
                "Endpoint must be an absolute http(s) URL, got '{}'",
                self.endpoint
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(Error::Config(
                "Request timeout must be greater than 0. Leave it unset to use the transport default."
                    .to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn http_client_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: "No HTTP client implementation provided. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default ReqwestHttpClient. \
                 Other hosts: inject a platform-native adapter with .http_client()."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    use bridge_desktop::ReqwestHttpClient;

    let client = ReqwestHttpClient::new().map_err(|e| Error::CapabilityMissing {
        capability: "HttpClient".to_string(),
        message: format!("Default desktop HTTP client could not be created: {}", e),
    })?;
    let client: Arc<dyn HttpClient> = Arc::new(client);
    Ok(client)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_http_client() -> Result<Arc<dyn HttpClient>> {
    Err(http_client_missing_error())
}

/// Builder for constructing [`GalleryConfig`] instances.
#[derive(Default)]
pub struct GalleryConfigBuilder {
    endpoint: Option<String>,
    http_client: Option<Arc<dyn HttpClient>>,
    request_timeout: Option<Duration>,
    user_agent: Option<String>,
    event_buffer_size: Option<usize>,
}

impl GalleryConfigBuilder {
    /// Sets the image list endpoint.
    ///
    /// Defaults to [`DEFAULT_IMAGE_LIST_ENDPOINT`].
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the HTTP client implementation.
    pub fn http_client(mut self, client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `GalleryConfig` instance.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when no HTTP client is set and no
    ///   platform default is available
    /// - [`Error::Config`] when a value fails [`GalleryConfig::validate`]
    pub fn build(self) -> Result<GalleryConfig> {
        let http_client = match self.http_client {
            Some(client) => client,
            None => provide_default_http_client()?,
        };

        let config = GalleryConfig {
            endpoint: self
                .endpoint
                .unwrap_or_else(|| DEFAULT_IMAGE_LIST_ENDPOINT.to_string()),
            http_client,
            request_timeout: self.request_timeout,
            user_agent: self.user_agent,
            event_buffer_size: self.event_buffer_size.unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}
