//! Courier order read model for the CQRS query side.
//!
//! - [`Projection`] trait for processing events into read models
//! - [`ProjectionProcessor`] for feeding events from the store to projections
//! - [`CourierView`]: courier lookup store fed by courier events
//! - [`CourierOrderView`]: courier order projector answering `FindCourierOrder`
//!   queries and pushing live updates through a [`SubscriptionRegistry`]

pub mod config;
pub mod error;
pub mod model;
pub mod processor;
pub mod projection;
pub mod store;
pub mod subscription;
pub mod views;

pub use config::ProjectorConfig;
pub use error::{EntityKind, ProjectionError, Result};
pub use model::{
    CourierModel, CourierOrderModel, CourierOrderRecord, CourierRecord, FindCourierOrder,
};
pub use processor::ProjectionProcessor;
pub use projection::{Projection, ProjectionPosition};
pub use store::{CourierOrderStore, CourierStore, InMemoryCourierOrderStore};
pub use subscription::{Subscription, SubscriptionRegistry};
pub use views::{CourierOrderView, CourierView, SubscriptionQueryResult};
