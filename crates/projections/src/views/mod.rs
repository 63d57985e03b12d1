//! Read model views for the CQRS query side.

pub mod courier_orders;
pub mod couriers;

pub use courier_orders::{CourierOrderView, SubscriptionQueryResult};
pub use couriers::CourierView;
