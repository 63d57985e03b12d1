//! Domain events for the courier order read side.
//!
//! The write side (order and courier aggregates) lives elsewhere; this crate
//! only carries the event payloads it publishes and the order state enum the
//! read model exposes.

pub mod courier;
pub mod courier_order;
pub mod error;
pub mod event;

pub use courier::{CourierCreatedData, CourierEvent};
pub use courier_order::{CourierOrderAssignedData, CourierOrderEvent, CourierOrderState};
pub use error::DomainError;
pub use event::DomainEvent;
