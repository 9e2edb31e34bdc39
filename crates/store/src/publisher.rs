//! Event sink for domain events.
//!
//! Publishing is fire-and-forget: the workflow layer hands over an
//! envelope and moves on, no acknowledgment flows back. Subscriber
//! dispatch, retries, and delivery guarantees belong to whatever system
//! sits behind the sink.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::LendingEvent;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Unique identifier for a published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A domain event wrapped with the metadata the sink contract requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique identifier for this occurrence.
    pub event_id: EventId,

    /// When the event was recorded.
    pub occurred_on: DateTime<Utc>,

    /// The event type name (e.g. "BookBorrowed").
    pub event_type: String,

    /// The event payload as JSON.
    pub payload: serde_json::Value,
}

impl From<&LendingEvent> for EventEnvelope {
    fn from(event: &LendingEvent) -> Self {
        let payload = match event {
            LendingEvent::BookBorrowed(data) => serde_json::to_value(data),
            LendingEvent::BookReturned(data) => serde_json::to_value(data),
            LendingEvent::LoanExtended(data) => serde_json::to_value(data),
            LendingEvent::LoanOverdue(data) => serde_json::to_value(data),
        }
        .unwrap_or(serde_json::Value::Null);

        Self {
            event_id: EventId::new(),
            occurred_on: Utc::now(),
            event_type: event.event_type().to_string(),
            payload,
        }
    }
}

/// Sink for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Hands an event over to the sink. Fire-and-forget.
    async fn publish(&self, envelope: EventEnvelope);
}

/// Publisher that writes events to the tracing log.
///
/// Stands in for a real event bus the way the surrounding system would
/// wire one; downstream consumers read the structured log instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

impl TracingEventPublisher {
    /// Creates a new tracing publisher.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, envelope: EventEnvelope) {
        tracing::info!(
            event_id = %envelope.event_id,
            event_type = %envelope.event_type,
            payload = %envelope.payload,
            "domain event published"
        );
    }
}

/// In-memory publisher that records envelopes for test assertions.
#[derive(Clone, Default)]
pub struct InMemoryEventPublisher {
    events: Arc<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventPublisher {
    /// Creates a new empty publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all published envelopes, in publish order.
    pub async fn published(&self) -> Vec<EventEnvelope> {
        self.events.read().await.clone()
    }

    /// Returns the published event type names, in publish order.
    pub async fn event_types(&self) -> Vec<String> {
        self.events
            .read()
            .await
            .iter()
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Returns the number of published events.
    pub async fn count(&self) -> usize {
        self.events.read().await.len()
    }

    /// Drops all recorded events.
    pub async fn clear(&self) {
        self.events.write().await.clear();
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventPublisher {
    async fn publish(&self, envelope: EventEnvelope) {
        self.events.write().await.push(envelope);
    }
}
