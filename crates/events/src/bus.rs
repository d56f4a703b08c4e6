//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] fans catalog events out to any number of subscribers; the
//! dispatch engine is the primary consumer. It is designed to be shared
//! via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelfwatch_core::types::DbId;
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// CatalogEvent
// ---------------------------------------------------------------------------

/// Event type fired once per durably persisted catalog item.
pub const ITEM_CREATED: &str = "item.created";

/// A catalog lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    /// Dot-separated event name, e.g. `"item.created"`.
    pub event_type: String,

    /// The catalog item the event concerns.
    pub item_id: DbId,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl CatalogEvent {
    /// Create an [`ITEM_CREATED`] event for the given item.
    pub fn item_created(item_id: DbId) -> Self {
        Self {
            event_type: ITEM_CREATED.to_string(),
            item_id,
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: CatalogEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(CatalogEvent::item_created(42));

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, ITEM_CREATED);
        assert_eq!(received.item_id, 42);
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_event() {
        let bus = EventBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(CatalogEvent::item_created(7));

        assert_eq!(rx1.recv().await.unwrap().item_id, 7);
        assert_eq!(rx2.recv().await.unwrap().item_id, 7);
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(CatalogEvent::item_created(1));
    }
}
