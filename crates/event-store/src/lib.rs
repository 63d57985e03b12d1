//! Replayable event feed consumed by the read-model projections.
//!
//! The write side owns durable storage; this crate only models what the
//! projections need from it: typed envelopes carrying a per-aggregate
//! sequence number, and a store that can be streamed from the start.

pub mod error;
pub mod event;
pub mod memory;
pub mod store;

pub use common::AggregateId;
pub use error::{EventStoreError, Result};
pub use event::{EventEnvelope, EventEnvelopeBuilder, EventId, SequenceNumber};
pub use memory::InMemoryEventStore;
pub use store::{AppendOptions, EventStore, EventStoreExt, EventStream};
