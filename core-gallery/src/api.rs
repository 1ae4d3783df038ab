//! Image list API client
//!
//! Wraps the single `GET` against the list endpoint and turns every outcome
//! into a `Result`, so the store only has to branch on the variant.
//!
//! ## Endpoint
//!
//! - **List**: `https://picsum.photos/v2/list` (configurable), returning a
//!   JSON array of [`ImageRecord`] objects.
//!
//! No retry, paging or timeout is applied here unless explicitly configured.

use crate::error::{GalleryError, Result};
use crate::models::ImageRecord;
use bridge_traits::error::BridgeError;
use bridge_traits::http::{HttpClient, HttpRequest};
use core_runtime::config::GalleryConfig;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the image list endpoint.
#[derive(Clone)]
pub struct ImageApi {
    http_client: Arc<dyn HttpClient>,
    endpoint: String,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ImageApi {
    /// Creates a client for `endpoint` with no user agent override and no timeout.
    pub fn new(http_client: Arc<dyn HttpClient>, endpoint: impl Into<String>) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            user_agent: None,
            timeout: None,
        }
    }

    /// Creates a client from a validated [`GalleryConfig`].
    pub fn from_config(config: &GalleryConfig) -> Self {
        Self {
            http_client: Arc::clone(&config.http_client),
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
            timeout: config.request_timeout,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self) -> HttpRequest {
        let mut request = HttpRequest::get(&self.endpoint).accept_json();

        if let Some(user_agent) = &self.user_agent {
            request = request.header("User-Agent", user_agent);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }

    /// Fetches the full image list.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ImageRecord>)` - records in server response order
    /// - `Err(GalleryError::Http)` - the server answered with a non-2xx status
    /// - `Err(GalleryError::Transport)` - no response was received
    /// - `Err(GalleryError::Decode)` - the body was not a JSON array of records
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>> {
        debug!(endpoint = %self.endpoint, "Requesting image list");

        let response = self
            .http_client
            .execute(self.build_request())
            .await
            .map_err(transport_error)?;

        if !response.is_success() {
            warn!(
                endpoint = %self.endpoint,
                status = response.status,
                "Image list request returned failure status"
            );
            return Err(GalleryError::Http {
                status: response.status,
            });
        }

        let images: Vec<ImageRecord> = serde_json::from_slice(&response.body)
            .map_err(|e| GalleryError::Decode(e.to_string()))?;

        debug!(count = images.len(), "Decoded image list");
        Ok(images)
    }
}

impl fmt::Debug for ImageApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageApi")
            .field("endpoint", &self.endpoint)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn transport_error(err: BridgeError) -> GalleryError {
    match err {
        BridgeError::Network(detail) => GalleryError::Transport(detail),
        other => GalleryError::Transport(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::http::{HttpMethod, HttpResponse};
    use mockall::mock;

    const ENDPOINT: &str = "https://picsum.photos/v2/list";

    mock! {
        HttpClient {}

        #[async_trait::async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> bridge_traits::error::Result<HttpResponse>;
        }
    }

    fn api_returning(
        f: impl Fn(HttpRequest) -> bridge_traits::error::Result<HttpResponse> + Send + 'static,
    ) -> ImageApi {
        let mut mock_http = MockHttpClient::new();
        mock_http.expect_execute().times(1).returning(f);
        ImageApi::new(Arc::new(mock_http), ENDPOINT)
    }

    #[tokio::test]
    async fn test_list_images_success() {
        let api = api_returning(|req| {
            assert_eq!(req.method, HttpMethod::Get);
            assert_eq!(req.url, ENDPOINT);
            assert_eq!(
                req.headers.get("Accept").map(String::as_str),
                Some("application/json")
            );
            assert!(req.timeout.is_none());
            Ok(HttpResponse::new(
                200,
                r#"[{"id":"0","author":"A"},{"id":"1","author":"B"}]"#,
            ))
        });

        let images = api.list_images().await.unwrap();
        let ids: Vec<&str> = images.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }

    #[tokio::test]
    async fn test_request_carries_user_agent_and_timeout() {
        let mut mock_http = MockHttpClient::new();
        mock_http
            .expect_execute()
            .withf(|req| {
                req.headers.get("User-Agent").map(String::as_str) == Some("gallery-test/1.0")
                    && req.timeout == Some(Duration::from_secs(3))
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(200, "[]")));

        let api = ImageApi::new(Arc::new(mock_http), ENDPOINT)
            .with_user_agent("gallery-test/1.0")
            .with_timeout(Duration::from_secs(3));

        assert!(api.list_images().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_status_maps_to_http_error() {
        let api = api_returning(|_| Ok(HttpResponse::new(503, "unavailable")));

        let err = api.list_images().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_network_error_keeps_transport_description() {
        let api = api_returning(|_| {
            Err(BridgeError::Network(
                "Connection failed: connection refused".to_string(),
            ))
        });

        let err = api.list_images().await.unwrap_err();
        assert!(matches!(err, GalleryError::Transport(_)));
        assert_eq!(err.to_string(), "Connection failed: connection refused");
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_other_bridge_errors_are_transport_errors() {
        let api = api_returning(|_| Err(BridgeError::NotAvailable("offline".to_string())));

        let err = api.list_images().await.unwrap_err();
        assert_eq!(err.to_string(), "Bridge capability not available: offline");
    }

    #[tokio::test]
    async fn test_malformed_body_maps_to_decode_error() {
        let api = api_returning(|_| Ok(HttpResponse::new(200, r#"{"id":"0"}"#)));

        let err = api.list_images().await.unwrap_err();
        assert!(matches!(err, GalleryError::Decode(_)));
        assert!(err.to_string().starts_with("Failed to decode image list"));
    }
}
