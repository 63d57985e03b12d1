//! Projection processor for feeding events to projections.

use event_store::{AppendOptions, EventEnvelope, EventStore, EventStoreExt, SequenceNumber};
use futures_util::StreamExt;

use crate::Result;
use crate::projection::Projection;

/// Delivers events from an event store to the registered projections.
///
/// - Catch-up: streams the whole feed, skipping events a projection has
///   already consumed
/// - Live delivery: hands one freshly published event to every projection
/// - Publish: records a new event in the feed only once every projection
///   accepts it, then delivers it
/// - Rebuild: resets every projection, then replays the feed from the start
///
/// Projections see events in registration order, so a projection another
/// one reads from (the courier view for the courier order view) must be
/// registered first.
pub struct ProjectionProcessor<S: EventStore> {
    store: S,
    projections: Vec<Box<dyn Projection>>,
}

impl<S: EventStore> ProjectionProcessor<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            projections: Vec::new(),
        }
    }

    pub fn register(&mut self, projection: Box<dyn Projection>) {
        tracing::debug!(projection = projection.name(), "projection registered");
        self.projections.push(projection);
    }

    pub fn projection_count(&self) -> usize {
        self.projections.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Streams the full feed and delivers each event to the projections
    /// that have not consumed it yet.
    #[tracing::instrument(skip(self))]
    pub async fn run_catch_up(&self) -> Result<()> {
        let mut stream = self.store.stream_all_events().await?;
        let mut event_index: u64 = 0;

        while let Some(result) = stream.next().await {
            let event = result?;
            event_index += 1;

            for projection in &self.projections {
                if !projection.position().await.has_seen(event_index) {
                    projection.handle(&event).await?;
                    metrics::counter!("projections_events_processed").increment(1);
                }
            }
        }

        tracing::info!(events = event_index, "catch-up complete");

        Ok(())
    }

    /// Delivers a single live event to all registered projections.
    #[tracing::instrument(
        skip(self, event),
        fields(event_type = %event.event_type, aggregate_id = %event.aggregate_id)
    )]
    pub async fn process_event(&self, event: &EventEnvelope) -> Result<()> {
        for projection in &self.projections {
            projection.handle(event).await?;
            metrics::counter!("projections_events_processed").increment(1);
        }
        Ok(())
    }

    /// Checks `event` against every projection without applying it.
    pub async fn check_event(&self, event: &EventEnvelope) -> Result<()> {
        for projection in &self.projections {
            projection.check(event).await?;
        }
        Ok(())
    }

    /// Appends `event` to the feed and delivers it live.
    ///
    /// An event a projection would reject is never appended, so the feed
    /// only holds events that replay cleanly. Callers must not publish or
    /// rebuild concurrently.
    #[tracing::instrument(
        skip(self, event),
        fields(event_type = %event.event_type, aggregate_id = %event.aggregate_id)
    )]
    pub async fn publish(&self, event: EventEnvelope) -> Result<SequenceNumber> {
        self.check_event(&event).await?;

        let sequence = self
            .store
            .append_event(event.clone(), AppendOptions::new())
            .await?;

        if let Err(err) = self.process_event(&event).await {
            tracing::error!(error = %err, "appended event failed to apply");
            return Err(err);
        }
        Ok(sequence)
    }

    /// Resets every projection and replays the feed from the beginning.
    #[tracing::instrument(skip(self))]
    pub async fn rebuild_all(&self) -> Result<()> {
        for projection in &self.projections {
            projection.reset().await?;
            tracing::info!(projection = projection.name(), "projection reset");
        }
        metrics::counter!("projections_rebuilds").increment(1);
        self.run_catch_up().await
    }
}
