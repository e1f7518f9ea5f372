use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::FeedEvent;

/// Unique identifier for a delivered event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
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

/// The unit carried by the event channel.
///
/// The payload stays raw JSON until [`FeedEvent::decode`] interprets it
/// according to `event_type`, so an envelope with an unknown tag or a broken
/// payload can still be received, logged and skipped.
///
/// `event_id` and `timestamp` are filled in when a producer omits them. They
/// are for tracing only; the read view never orders by them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope {
    #[serde(default)]
    pub event_id: EventId,

    /// The event type tag, e.g. `"TweetCreated"`.
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    pub payload: serde_json::Value,
}

impl EventEnvelope {
    /// Creates a new event envelope builder.
    pub fn builder() -> EventEnvelopeBuilder {
        EventEnvelopeBuilder::default()
    }

    /// Wraps a typed event.
    pub fn from_event(event: &FeedEvent) -> Result<Self, serde_json::Error> {
        Ok(Self {
            event_id: EventId::new(),
            event_type: event.event_type().to_string(),
            timestamp: Utc::now(),
            payload: event.payload()?,
        })
    }
}

/// Builder for constructing event envelopes.
#[derive(Debug, Default)]
pub struct EventEnvelopeBuilder {
    event_id: Option<EventId>,
    event_type: Option<String>,
    payload: Option<serde_json::Value>,
}

impl EventEnvelopeBuilder {
    /// Sets the event ID. If not set, a new ID will be generated.
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    /// Sets the event type tag.
    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    /// Sets the payload from a raw JSON value.
    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the envelope, returning None if the type tag or payload is missing.
    pub fn try_build(self) -> Option<EventEnvelope> {
        Some(EventEnvelope {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self.event_type?,
            timestamp: Utc::now(),
            payload: self.payload?,
        })
    }

    /// Builds the envelope.
    ///
    /// # Panics
    ///
    /// Panics if the event type or the payload is not set.
    pub fn build(self) -> EventEnvelope {
        self.try_build()
            .expect("event_type and payload are required")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_id_new_creates_unique_ids() {
        assert_ne!(EventId::new(), EventId::new());
    }

    #[test]
    fn envelope_builder_sets_fields() {
        let id = EventId::new();
        let payload = serde_json::json!({"id": "u1", "username": "alice"});

        let envelope = EventEnvelope::builder()
            .event_id(id)
            .event_type("UserCreated")
            .payload_raw(payload.clone())
            .build();

        assert_eq!(envelope.event_id, id);
        assert_eq!(envelope.event_type, "UserCreated");
        assert_eq!(envelope.payload, payload);
    }

    #[test]
    fn try_build_returns_none_without_type() {
        let result = EventEnvelope::builder()
            .payload_raw(serde_json::json!({}))
            .try_build();
        assert!(result.is_none());
    }

    #[test]
    fn minimal_wire_envelope_gets_defaults() {
        let envelope: EventEnvelope = serde_json::from_value(serde_json::json!({
            "type": "UserCreated",
            "payload": {"id": "u1", "username": "alice", "password": "pw"}
        }))
        .unwrap();

        assert_eq!(envelope.event_type, "UserCreated");
        assert_eq!(envelope.payload["username"], "alice");
    }

    #[test]
    fn envelope_serializes_type_tag() {
        let envelope = EventEnvelope::builder()
            .event_type("FollowCreated")
            .payload_raw(serde_json::json!({}))
            .build();
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["type"], "FollowCreated");
        assert!(json.get("eventId").is_some());
    }
}
