//! Store construction from configuration

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
use core_gallery::ImageStore;
use core_runtime::config::{GalleryConfig, DEFAULT_IMAGE_LIST_ENDPOINT};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Records every request and answers with an empty list.
#[derive(Default)]
struct RecordingHttpClient {
    requests: Mutex<Vec<HttpRequest>>,
}

#[async_trait]
impl HttpClient for RecordingHttpClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        Ok(HttpResponse::new(200, "[]"))
    }
}

#[tokio::test]
async fn test_store_uses_configured_request_settings() {
    let client = Arc::new(RecordingHttpClient::default());
    let config = GalleryConfig::builder()
        .http_client(client.clone())
        .endpoint("http://127.0.0.1:9000/v2/list")
        .user_agent("gallery-test/1.0")
        .request_timeout(Duration::from_secs(2))
        .event_buffer_size(4)
        .build()
        .unwrap();

    let store = ImageStore::from_config(&config);
    assert_eq!(store.endpoint(), "http://127.0.0.1:9000/v2/list");

    store.fetch_images().await;
    assert!(store.error().is_none());
    assert!(store.is_empty());

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.url, "http://127.0.0.1:9000/v2/list");
    assert_eq!(
        request.headers.get("User-Agent").map(String::as_str),
        Some("gallery-test/1.0")
    );
    assert_eq!(request.timeout, Some(Duration::from_secs(2)));
}

#[tokio::test]
async fn test_default_config_leaves_timeout_to_transport() {
    let client = Arc::new(RecordingHttpClient::default());
    let config = GalleryConfig::builder()
        .http_client(client.clone())
        .build()
        .unwrap();

    let store = ImageStore::from_config(&config);
    assert_eq!(store.endpoint(), DEFAULT_IMAGE_LIST_ENDPOINT);

    store.fetch_images().await;

    let requests = client.requests.lock().unwrap();
    assert_eq!(requests[0].timeout, None);
    assert!(!requests[0].headers.contains_key("User-Agent"));
}

#[cfg(not(feature = "desktop-shims"))]
#[test]
fn test_with_defaults_requires_transport() {
    let err = ImageStore::with_defaults().unwrap_err();
    assert!(matches!(
        err,
        core_gallery::GalleryError::Config(core_runtime::Error::CapabilityMissing { .. })
    ));
    assert!(err.to_string().contains("HttpClient"));
}

#[cfg(feature = "desktop-shims")]
#[test]
fn test_with_defaults_uses_desktop_transport() {
    let store = ImageStore::with_defaults().expect("desktop transport available");
    assert_eq!(store.endpoint(), DEFAULT_IMAGE_LIST_ENDPOINT);
    assert!(store.is_empty());
}
