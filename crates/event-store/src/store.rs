use std::pin::Pin;

use async_trait::async_trait;
use futures_core::Stream;

use crate::{AggregateId, EventEnvelope, EventStoreError, Result, SequenceNumber};

/// Options for appending events to the store.
#[derive(Debug, Clone, Default)]
pub struct AppendOptions {
    /// Sequence number the aggregate is expected to be at.
    /// If None, only contiguity of the new events is checked.
    pub expected_sequence: Option<SequenceNumber>,
}

impl AppendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_sequence(sequence: SequenceNumber) -> Self {
        Self {
            expected_sequence: Some(sequence),
        }
    }

    /// Expects the aggregate to have no events yet.
    pub fn expect_new() -> Self {
        Self {
            expected_sequence: Some(SequenceNumber::initial()),
        }
    }
}

/// A stream of events.
pub type EventStream = Pin<Box<dyn Stream<Item = Result<EventEnvelope>> + Send>>;

/// Source of events for the read side.
///
/// Implementations must be replay-capable: [`EventStore::stream_all_events`]
/// always starts from the very first event, in the order events were appended.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends events for a single aggregate atomically.
    ///
    /// Returns the sequence number of the last appended event.
    async fn append(
        &self,
        events: Vec<EventEnvelope>,
        options: AppendOptions,
    ) -> Result<SequenceNumber>;

    /// Retrieves all events for one aggregate in sequence order.
    ///
    /// Aggregates are identified by type and id together; a courier and an
    /// order may share an id without sharing a sequence.
    async fn get_events_for_aggregate(
        &self,
        aggregate_type: &str,
        aggregate_id: &AggregateId,
    ) -> Result<Vec<EventEnvelope>>;

    /// Streams every event in append order.
    async fn stream_all_events(&self) -> Result<EventStream>;

    /// Returns the latest sequence number of an aggregate, or None if it has
    /// no events.
    async fn get_aggregate_sequence(
        &self,
        aggregate_type: &str,
        aggregate_id: &AggregateId,
    ) -> Result<Option<SequenceNumber>>;
}

/// Convenience methods available on every [`EventStore`].
#[async_trait]
pub trait EventStoreExt: EventStore {
    async fn append_event(
        &self,
        event: EventEnvelope,
        options: AppendOptions,
    ) -> Result<SequenceNumber> {
        self.append(vec![event], options).await
    }

    async fn aggregate_exists(
        &self,
        aggregate_type: &str,
        aggregate_id: &AggregateId,
    ) -> Result<bool> {
        Ok(self
            .get_aggregate_sequence(aggregate_type, aggregate_id)
            .await?
            .is_some())
    }
}

impl<T: EventStore + ?Sized> EventStoreExt for T {}

/// Checks that a batch targets one aggregate with contiguous sequence numbers.
pub fn validate_events_for_append(events: &[EventEnvelope]) -> Result<()> {
    let Some(first) = events.first() else {
        return Err(EventStoreError::InvalidAppend(
            "cannot append empty event list".to_string(),
        ));
    };

    let mut expected = first.sequence_number;
    for event in events.iter().skip(1) {
        if event.aggregate_id != first.aggregate_id
            || event.aggregate_type != first.aggregate_type
        {
            return Err(EventStoreError::InvalidAppend(
                "all events must belong to the same aggregate".to_string(),
            ));
        }
        expected = expected.next();
        if event.sequence_number != expected {
            return Err(EventStoreError::InvalidAppend(format!(
                "sequence numbers must be contiguous: expected {expected}, got {}",
                event.sequence_number
            )));
        }
    }

    Ok(())
}
