//! Courier order domain events.

use common::AggregateId;
use serde::{Deserialize, Serialize};

use crate::event::DomainEvent;

/// Events published by the courier order aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CourierOrderEvent {
    /// A courier order was opened for a restaurant order.
    OrderCreated,

    /// A courier accepted the order.
    OrderAssigned(CourierOrderAssignedData),

    /// An assignment attempt was refused.
    OrderNotAssigned,

    /// The courier delivered the order.
    OrderDelivered,
}

impl CourierOrderEvent {
    pub fn order_assigned(courier_id: impl Into<AggregateId>) -> Self {
        CourierOrderEvent::OrderAssigned(CourierOrderAssignedData {
            courier_id: courier_id.into(),
        })
    }
}

impl DomainEvent for CourierOrderEvent {
    const AGGREGATE_TYPE: &'static str = "CourierOrder";

    fn event_type(&self) -> &'static str {
        match self {
            CourierOrderEvent::OrderCreated => "CourierOrderCreated",
            CourierOrderEvent::OrderAssigned(_) => "CourierOrderAssigned",
            CourierOrderEvent::OrderNotAssigned => "CourierOrderNotAssigned",
            CourierOrderEvent::OrderDelivered => "CourierOrderDelivered",
        }
    }
}

/// Data for the OrderAssigned event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierOrderAssignedData {
    /// The courier who took the order.
    pub courier_id: AggregateId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        assert_eq!(
            CourierOrderEvent::OrderCreated.event_type(),
            "CourierOrderCreated"
        );
        assert_eq!(
            CourierOrderEvent::order_assigned("C1").event_type(),
            "CourierOrderAssigned"
        );
        assert_eq!(
            CourierOrderEvent::OrderNotAssigned.event_type(),
            "CourierOrderNotAssigned"
        );
        assert_eq!(
            CourierOrderEvent::OrderDelivered.event_type(),
            "CourierOrderDelivered"
        );
    }

    #[test]
    fn payload_shape() {
        let json = serde_json::to_value(CourierOrderEvent::order_assigned("C1")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "OrderAssigned", "data": {"courier_id": "C1"}})
        );

        let created: CourierOrderEvent =
            serde_json::from_value(serde_json::json!({"type": "OrderCreated"})).unwrap();
        assert_eq!(created, CourierOrderEvent::OrderCreated);
    }
}
