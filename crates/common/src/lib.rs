//! Shared types for the courier order read-model service.

pub mod types;

pub use types::AggregateId;
