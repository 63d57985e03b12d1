//! Projection error types.

use common::AggregateId;
use domain::DomainError;
use event_store::SequenceNumber;
use thiserror::Error;

/// Kind of read-model entity a lookup was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Order,
    Courier,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Order => f.write_str("Courier order"),
            EntityKind::Courier => f.write_str("Courier"),
        }
    }
}

/// Errors that can occur during projection processing and queries.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// An event or query referenced an entity missing from the read store.
    #[error("{kind} with id '{id}' not found")]
    NotFound { kind: EntityKind, id: AggregateId },

    /// An event arrived out of order for its aggregate.
    #[error("Sequence gap for aggregate {aggregate_id}: expected {expected}, got {actual}")]
    SequenceGap {
        aggregate_id: AggregateId,
        expected: SequenceNumber,
        actual: SequenceNumber,
    },

    /// The event would move an order backwards in its lifecycle.
    #[error(transparent)]
    InvalidTransition(#[from] DomainError),

    /// An error occurred in the event store.
    #[error("Event store error: {0}")]
    EventStore(#[from] event_store::EventStoreError),

    /// Failed to deserialize an event payload.
    #[error("Event deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The read store failed to complete an operation.
    #[error("Read store error: {0}")]
    Store(String),
}

impl ProjectionError {
    pub fn order_not_found(id: &AggregateId) -> Self {
        ProjectionError::NotFound {
            kind: EntityKind::Order,
            id: id.clone(),
        }
    }

    pub fn courier_not_found(id: &AggregateId) -> Self {
        ProjectionError::NotFound {
            kind: EntityKind::Courier,
            id: id.clone(),
        }
    }

    /// Returns true for a missing order or courier.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ProjectionError::NotFound { .. })
    }
}

/// Result type for projection operations.
pub type Result<T> = std::result::Result<T, ProjectionError>;
