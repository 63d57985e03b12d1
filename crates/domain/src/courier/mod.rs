//! Courier events.

mod events;

pub use events::{CourierCreatedData, CourierEvent};
