use thiserror::Error;

use crate::{AggregateId, SequenceNumber};

/// Errors that can occur when interacting with the event store.
#[derive(Debug, Error)]
pub enum EventStoreError {
    /// The expected sequence number did not match the stored one.
    #[error(
        "Concurrency conflict for aggregate {aggregate_id}: expected sequence {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        aggregate_id: AggregateId,
        expected: SequenceNumber,
        actual: SequenceNumber,
    },

    /// The batch handed to `append` was malformed.
    #[error("Invalid append: {0}")]
    InvalidAppend(String),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for event store operations.
pub type Result<T> = std::result::Result<T, EventStoreError>;
