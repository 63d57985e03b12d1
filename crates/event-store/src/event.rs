use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::AggregateId;

/// Unique identifier for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random event ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

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

/// Position of an event within its aggregate's history.
///
/// The first event of an aggregate carries sequence number 1; every
/// following event increments it by exactly one. Zero means "nothing
/// applied yet".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SequenceNumber(i64);

impl SequenceNumber {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// The position before any event has been recorded.
    pub fn initial() -> Self {
        Self(0)
    }

    /// The position of an aggregate's first event.
    pub fn first() -> Self {
        Self(1)
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns true if `other` directly follows this position.
    pub fn is_followed_by(&self, other: SequenceNumber) -> bool {
        self.next() == other
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for SequenceNumber {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for i64 {
    fn from(sequence: SequenceNumber) -> Self {
        sequence.0
    }
}

/// A domain event together with the metadata the feed attaches to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    #[serde(default)]
    pub event_id: EventId,

    /// The type of the event (e.g. "CourierOrderAssigned").
    pub event_type: String,

    /// The aggregate this event belongs to.
    pub aggregate_id: AggregateId,

    /// The type of aggregate ("CourierOrder", "Courier").
    pub aggregate_type: String,

    /// Position of this event in the aggregate's history.
    pub sequence_number: SequenceNumber,

    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,

    /// The event payload as JSON.
    pub payload: serde_json::Value,

    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl EventEnvelope {
    pub fn builder() -> EventEnvelopeBuilder {
        EventEnvelopeBuilder::default()
    }

    /// Deserializes the payload into a typed event.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        T::deserialize(&self.payload)
    }
}

/// Builder for constructing event envelopes.
#[derive(Debug, Default)]
pub struct EventEnvelopeBuilder {
    event_id: Option<EventId>,
    event_type: Option<String>,
    aggregate_id: Option<AggregateId>,
    aggregate_type: Option<String>,
    sequence_number: Option<SequenceNumber>,
    timestamp: Option<DateTime<Utc>>,
    payload: Option<serde_json::Value>,
    metadata: HashMap<String, serde_json::Value>,
}

impl EventEnvelopeBuilder {
    pub fn event_id(mut self, id: EventId) -> Self {
        self.event_id = Some(id);
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = Some(event_type.into());
        self
    }

    pub fn aggregate_id(mut self, id: impl Into<AggregateId>) -> Self {
        self.aggregate_id = Some(id.into());
        self
    }

    pub fn aggregate_type(mut self, aggregate_type: impl Into<String>) -> Self {
        self.aggregate_type = Some(aggregate_type.into());
        self
    }

    pub fn sequence_number(mut self, sequence: impl Into<SequenceNumber>) -> Self {
        self.sequence_number = Some(sequence.into());
        self
    }

    /// Sets the timestamp. Defaults to now.
    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Sets the payload from a serializable value.
    pub fn payload<T: Serialize>(mut self, payload: &T) -> Result<Self, serde_json::Error> {
        self.payload = Some(serde_json::to_value(payload)?);
        Ok(self)
    }

    pub fn payload_raw(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Builds the envelope.
    ///
    /// # Panics
    ///
    /// Panics if event_type, aggregate_id, aggregate_type, sequence_number or
    /// payload is missing. Use [`Self::try_build`] for untrusted input.
    pub fn build(self) -> EventEnvelope {
        EventEnvelope {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self.event_type.expect("event_type is required"),
            aggregate_id: self.aggregate_id.expect("aggregate_id is required"),
            aggregate_type: self.aggregate_type.expect("aggregate_type is required"),
            sequence_number: self.sequence_number.expect("sequence_number is required"),
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            payload: self.payload.expect("payload is required"),
            metadata: self.metadata,
        }
    }

    pub fn try_build(self) -> Option<EventEnvelope> {
        Some(EventEnvelope {
            event_id: self.event_id.unwrap_or_default(),
            event_type: self.event_type?,
            aggregate_id: self.aggregate_id?,
            aggregate_type: self.aggregate_type?,
            sequence_number: self.sequence_number?,
            timestamp: self.timestamp.unwrap_or_else(Utc::now),
            payload: self.payload?,
            metadata: self.metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_numbers_are_contiguous() {
        assert_eq!(SequenceNumber::initial().next(), SequenceNumber::first());
        assert!(SequenceNumber::new(3).is_followed_by(SequenceNumber::new(4)));
        assert!(!SequenceNumber::new(3).is_followed_by(SequenceNumber::new(3)));
        assert!(!SequenceNumber::new(3).is_followed_by(SequenceNumber::new(5)));
    }

    #[test]
    fn builder_sets_all_fields() {
        let envelope = EventEnvelope::builder()
            .event_type("CourierOrderCreated")
            .aggregate_id("O1")
            .aggregate_type("CourierOrder")
            .sequence_number(1)
            .payload_raw(serde_json::json!({"type": "OrderCreated"}))
            .metadata("correlation_id", serde_json::json!("abc"))
            .build();

        assert_eq!(envelope.aggregate_id.as_str(), "O1");
        assert_eq!(envelope.sequence_number, SequenceNumber::first());
        assert_eq!(
            envelope.metadata.get("correlation_id"),
            Some(&serde_json::json!("abc"))
        );
    }

    #[test]
    fn try_build_rejects_missing_fields() {
        assert!(EventEnvelope::builder().event_type("X").try_build().is_none());
    }

    #[test]
    fn envelope_accepts_minimal_json() {
        let json = serde_json::json!({
            "event_type": "CourierOrderDelivered",
            "aggregate_id": "O9",
            "aggregate_type": "CourierOrder",
            "sequence_number": 3,
            "payload": {"type": "OrderDelivered"}
        });
        let envelope: EventEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(envelope.sequence_number.as_i64(), 3);
        assert!(envelope.metadata.is_empty());
    }
}
