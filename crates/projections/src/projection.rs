//! Core projection trait and position tracking.

use async_trait::async_trait;
use event_store::EventEnvelope;

use crate::Result;

/// Number of feed events a projection has consumed, handled or skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectionPosition {
    pub events_processed: u64,
}

impl ProjectionPosition {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn advance(&self) -> Self {
        Self {
            events_processed: self.events_processed + 1,
        }
    }

    /// Returns true if the event at 1-based feed index `index` was already
    /// consumed.
    pub fn has_seen(&self, index: u64) -> bool {
        index <= self.events_processed
    }
}

impl std::fmt::Display for ProjectionPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "position({})", self.events_processed)
    }
}

/// A projection that folds feed events into a read model.
///
/// Every event in the feed is offered to every projection; events of
/// aggregate types a projection does not care about still advance its
/// position.
#[async_trait]
pub trait Projection: Send + Sync {
    fn name(&self) -> &'static str;

    /// Applies a single event to the read model.
    async fn handle(&self, event: &EventEnvelope) -> Result<()>;

    /// Fails with the error `handle` would return for `event`, without
    /// touching the read model.
    async fn check(&self, _event: &EventEnvelope) -> Result<()> {
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition;

    /// Clears the read model before a replay. Must be idempotent.
    async fn reset(&self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_advances_from_zero() {
        let pos = ProjectionPosition::zero().advance().advance();
        assert_eq!(pos.events_processed, 2);
        assert_eq!(pos.to_string(), "position(2)");
    }

    #[test]
    fn has_seen_compares_feed_index() {
        let pos = ProjectionPosition { events_processed: 3 };
        assert!(pos.has_seen(3));
        assert!(!pos.has_seen(4));
        assert!(!ProjectionPosition::zero().has_seen(1));
    }
}
