//! Route handlers and the state they share.

pub mod courier_orders;
pub mod events;
pub mod ops;

use std::sync::Arc;

use event_store::EventStore;
use projections::{CourierOrderView, CourierView, ProjectionProcessor};
use tokio::sync::Mutex;

/// Shared application state.
pub struct AppState<S: EventStore> {
    pub event_store: S,
    pub processor: Arc<ProjectionProcessor<S>>,
    pub courier_orders: CourierOrderView,
    pub couriers: CourierView,
    /// Held while events are delivered to the views so live events and
    /// replays reach the processor one at a time, in feed order.
    pub delivery: Mutex<()>,
}
