//! Courier domain events.

use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

/// Events published by the courier aggregate that the read side consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CourierEvent {
    /// A courier registered with the service.
    CourierCreated(CourierCreatedData),
}

impl CourierEvent {
    pub fn courier_created(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        max_number_of_active_orders: u32,
    ) -> Self {
        CourierEvent::CourierCreated(CourierCreatedData {
            first_name: first_name.into(),
            last_name: last_name.into(),
            max_number_of_active_orders,
        })
    }
}

impl DomainEvent for CourierEvent {
    const AGGREGATE_TYPE: &'static str = "Courier";

    fn event_type(&self) -> &'static str {
        match self {
            CourierEvent::CourierCreated(_) => "CourierCreated",
        }
    }
}

/// Data for the CourierCreated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierCreatedData {
    pub first_name: String,
    pub last_name: String,
    /// How many orders the courier may carry at once.
    pub max_number_of_active_orders: u32,
}
