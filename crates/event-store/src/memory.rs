use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    AggregateId, EventEnvelope, EventStoreError, Result, SequenceNumber,
    store::{AppendOptions, EventStore, EventStream, validate_events_for_append},
};

/// In-memory event feed.
///
/// Keeps events in append order so that replays observe exactly the order
/// in which the write side published them.
#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    events: Arc<RwLock<Vec<EventEnvelope>>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of events stored.
    pub async fn event_count(&self) -> usize {
        self.events.read().await.len()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    #[tracing::instrument(skip(self, events), fields(count = events.len()))]
    async fn append(
        &self,
        events: Vec<EventEnvelope>,
        options: AppendOptions,
    ) -> Result<SequenceNumber> {
        validate_events_for_append(&events)?;

        let aggregate_id = events[0].aggregate_id.clone();
        let first_sequence = events[0].sequence_number;

        let mut store = self.events.write().await;

        let current = latest_sequence(&store, &events[0].aggregate_type, &aggregate_id)
            .unwrap_or(SequenceNumber::initial());

        if let Some(expected) = options.expected_sequence
            && current != expected
        {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected,
                actual: current,
            });
        }

        if !current.is_followed_by(first_sequence) {
            return Err(EventStoreError::ConcurrencyConflict {
                aggregate_id,
                expected: current.next(),
                actual: first_sequence,
            });
        }

        let last = events
            .last()
            .map(|e| e.sequence_number)
            .unwrap_or(first_sequence);
        store.extend(events);
        metrics::gauge!("event_store_events").set(store.len() as f64);

        Ok(last)
    }

    async fn get_events_for_aggregate(
        &self,
        aggregate_type: &str,
        aggregate_id: &AggregateId,
    ) -> Result<Vec<EventEnvelope>> {
        let store = self.events.read().await;
        let mut events: Vec<_> = store
            .iter()
            .filter(|e| e.aggregate_type == aggregate_type && &e.aggregate_id == aggregate_id)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.sequence_number);
        Ok(events)
    }

    async fn stream_all_events(&self) -> Result<EventStream> {
        use futures_util::stream;

        let events = self.events.read().await.clone();
        let stream = stream::iter(events.into_iter().map(Ok));
        Ok(Box::pin(stream))
    }

    async fn get_aggregate_sequence(
        &self,
        aggregate_type: &str,
        aggregate_id: &AggregateId,
    ) -> Result<Option<SequenceNumber>> {
        let store = self.events.read().await;
        Ok(latest_sequence(&store, aggregate_type, aggregate_id))
    }
}

fn latest_sequence(
    events: &[EventEnvelope],
    aggregate_type: &str,
    aggregate_id: &AggregateId,
) -> Option<SequenceNumber> {
    events
        .iter()
        .filter(|e| e.aggregate_type == aggregate_type && &e.aggregate_id == aggregate_id)
        .map(|e| e.sequence_number)
        .max()
}
