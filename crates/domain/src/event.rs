//! Domain event trait and envelope wrapping.

use common::AggregateId;
use event_store::{EventEnvelope, SequenceNumber};
use serde::{Serialize, de::DeserializeOwned};

/// Trait for domain events published by the write side.
///
/// Domain events represent facts that have happened in the domain.
/// They are immutable and named in past tense.
pub trait DomainEvent: Serialize + DeserializeOwned + Send + Sync + Clone {
    /// Type of the aggregate that emits this event.
    const AGGREGATE_TYPE: &'static str;

    /// Returns the event type name.
    fn event_type(&self) -> &'static str;

    /// Wraps the event in an envelope positioned at `sequence` in the
    /// history of `aggregate_id`.
    fn to_envelope(
        &self,
        aggregate_id: impl Into<AggregateId>,
        sequence: impl Into<SequenceNumber>,
    ) -> Result<EventEnvelope, serde_json::Error> {
        Ok(EventEnvelope::builder()
            .aggregate_id(aggregate_id)
            .aggregate_type(Self::AGGREGATE_TYPE)
            .event_type(self.event_type())
            .sequence_number(sequence)
            .payload(self)?
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    enum TestEvent {
        Happened { value: i32 },
    }

    impl DomainEvent for TestEvent {
        const AGGREGATE_TYPE: &'static str = "Test";

        fn event_type(&self) -> &'static str {
            "TestHappened"
        }
    }

    #[test]
    fn envelope_carries_type_and_sequence() {
        let envelope = TestEvent::Happened { value: 7 }
            .to_envelope("T1", 4)
            .unwrap();

        assert_eq!(envelope.aggregate_type, "Test");
        assert_eq!(envelope.event_type, "TestHappened");
        assert_eq!(envelope.sequence_number, SequenceNumber::new(4));
        let decoded: TestEvent = envelope.decode().unwrap();
        assert!(matches!(decoded, TestEvent::Happened { value: 7 }));
    }
}
