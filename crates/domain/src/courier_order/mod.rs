//! Courier order events and lifecycle state.

mod events;
mod state;

pub use events::{CourierOrderAssignedData, CourierOrderEvent};
pub use state::CourierOrderState;
