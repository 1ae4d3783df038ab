//! # Event Bus System
//!
//! Broadcasts store lifecycle transitions to any number of listeners using
//! `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event Types**: [`GalleryEvent`] describes what happened to a fetch
//! - **EventBus**: Central broadcast channel for publishing events
//! - **EventStream**: Wrapper for consuming events with filtering
//!
//! State *values* (the image list, loading flag, error message) are observed
//! through the store's own watch channel. The bus carries the transitions, which
//! is what toast notifications or telemetry want to react to.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, GalleryEvent};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(16);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(GalleryEvent::FetchSucceeded {
//!         endpoint: "https://picsum.photos/v2/list".to_string(),
//!         count: 30,
//!     })
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Image list fetched");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber was too slow and missed `n`
//!   events. Non-fatal; keep receiving.
//! - **`RecvError::Closed`**: all senders have been dropped. Treat as shutdown.
//!
//! Emitting with no subscribers returns `Err(SendError)`; publishers in this
//! workspace ignore that case.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that fall further behind than this receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Lifecycle events emitted by the image store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum GalleryEvent {
    /// A fetch of the image list was started.
    FetchStarted {
        /// Endpoint being requested.
        endpoint: String,
    },
    /// The image list was fetched and replaced the stored collection.
    FetchSucceeded {
        endpoint: String,
        /// Number of records now held by the store.
        count: usize,
    },
    /// The fetch failed; the stored collection was left untouched.
    FetchFailed {
        endpoint: String,
        /// Message recorded in the store's error field.
        message: String,
        /// HTTP status, when a response was received.
        status: Option<u16>,
    },
}

impl GalleryEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            GalleryEvent::FetchStarted { .. } => "Image list fetch started",
            GalleryEvent::FetchSucceeded { .. } => "Image list fetched",
            GalleryEvent::FetchFailed { .. } => "Image list fetch failed",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            GalleryEvent::FetchStarted { .. } => EventSeverity::Debug,
            GalleryEvent::FetchSucceeded { .. } => EventSeverity::Info,
            GalleryEvent::FetchFailed { .. } => EventSeverity::Error,
        }
    }

    /// Endpoint the event refers to.
    pub fn endpoint(&self) -> &str {
        match self {
            GalleryEvent::FetchStarted { endpoint }
            | GalleryEvent::FetchSucceeded { endpoint, .. }
            | GalleryEvent::FetchFailed { endpoint, .. } => endpoint,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Central event bus for publishing and subscribing to gallery events.
///
/// Cloning is cheap; every clone publishes into the same channel.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GalleryEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero (a `tokio::sync::broadcast` requirement).
    /// [`GalleryConfig`](crate::config::GalleryConfig) validation rejects a zero
    /// buffer before a bus is ever built from it.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: GalleryEvent) -> Result<usize, SendError<GalleryEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<GalleryEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

type EventFilter = Box<dyn Fn(&GalleryEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with predicate filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, GalleryEvent};
///
/// let event_bus = EventBus::new(100);
/// let failures = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, GalleryEvent::FetchFailed { .. }));
/// ```
pub struct EventStream {
    receiver: Receiver<GalleryEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<GalleryEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&GalleryEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<GalleryEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive a matching event without waiting.
    ///
    /// Returns `None` if no matching events are currently available.
    pub fn try_recv(&mut self) -> Option<Result<GalleryEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENDPOINT: &str = "https://picsum.photos/v2/list";

    fn failed(message: &str) -> GalleryEvent {
        GalleryEvent::FetchFailed {
            endpoint: ENDPOINT.to_string(),
            message: message.to_string(),
            status: Some(500),
        }
    }

    #[tokio::test]
    async fn test_emit_without_subscribers() {
        let bus = EventBus::new(10);
        let result = bus.emit(GalleryEvent::FetchStarted {
            endpoint: ENDPOINT.to_string(),
        });
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        let event = GalleryEvent::FetchSucceeded {
            endpoint: ENDPOINT.to_string(),
            count: 30,
        };
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| matches!(event, GalleryEvent::FetchFailed { .. }));

        bus.emit(GalleryEvent::FetchStarted {
            endpoint: ENDPOINT.to_string(),
        })
        .ok();
        bus.emit(failed("HTTP error! status: 500")).ok();

        let received = stream.recv().await.unwrap();
        assert_eq!(received, failed("HTTP error! status: 500"));
    }

    #[tokio::test]
    async fn test_try_recv_empty_and_filtered() {
        let bus = EventBus::new(10);
        let mut stream = EventStream::new(bus.subscribe())
            .filter(|event| event.severity() >= EventSeverity::Info);
        assert!(stream.try_recv().is_none());

        bus.emit(GalleryEvent::FetchStarted {
            endpoint: ENDPOINT.to_string(),
        })
        .ok();
        assert!(stream.try_recv().is_none());

        bus.emit(failed("boom")).ok();
        assert!(matches!(stream.try_recv(), Some(Ok(GalleryEvent::FetchFailed { .. }))));
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(GalleryEvent::FetchSucceeded {
                endpoint: ENDPOINT.to_string(),
                count: i,
            })
            .ok();
        }

        let result = sub.recv().await;
        assert!(matches!(result, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity_and_description() {
        let started = GalleryEvent::FetchStarted {
            endpoint: ENDPOINT.to_string(),
        };
        assert_eq!(started.severity(), EventSeverity::Debug);
        assert_eq!(started.endpoint(), ENDPOINT);

        assert_eq!(failed("x").severity(), EventSeverity::Error);
        assert_eq!(failed("x").description(), "Image list fetch failed");
    }

    #[test]
    fn test_event_serialization_is_tagged() {
        let json = serde_json::to_value(failed("HTTP error! status: 500")).unwrap();
        assert_eq!(json["event"], "FetchFailed");
        assert_eq!(json["status"], 500);

        let back: GalleryEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, failed("HTTP error! status: 500"));
    }
}
