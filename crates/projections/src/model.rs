//! Read-store records and the views composed from them.

use common::AggregateId;
use domain::CourierOrderState;
use event_store::SequenceNumber;
use serde::{Deserialize, Serialize};

/// A courier as kept by the courier read store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierRecord {
    pub id: AggregateId,
    pub aggregate_version: SequenceNumber,
    pub first_name: String,
    pub last_name: String,
    pub max_number_of_active_orders: u32,
}

/// A courier order as kept by the order read store.
///
/// The courier is embedded as it was when the order was assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierOrderRecord {
    pub id: AggregateId,
    /// Sequence number of the last event applied to this record.
    pub aggregate_version: SequenceNumber,
    pub courier: Option<CourierRecord>,
    pub state: CourierOrderState,
}

impl CourierOrderRecord {
    /// A freshly created order with no courier.
    pub fn created(id: AggregateId, sequence: SequenceNumber) -> Self {
        Self {
            id,
            aggregate_version: sequence,
            courier: None,
            state: CourierOrderState::Created,
        }
    }
}

/// Courier summary embedded in a [`CourierOrderModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierModel {
    pub id: AggregateId,
    pub aggregate_version: SequenceNumber,
    pub first_name: String,
    pub last_name: String,
    pub max_number_of_active_orders: u32,
}

impl From<&CourierRecord> for CourierModel {
    fn from(record: &CourierRecord) -> Self {
        Self {
            id: record.id.clone(),
            aggregate_version: record.aggregate_version,
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            max_number_of_active_orders: record.max_number_of_active_orders,
        }
    }
}

/// Answer to a [`FindCourierOrder`] query and payload of live updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourierOrderModel {
    pub id: AggregateId,
    pub aggregate_version: SequenceNumber,
    /// Absent until a courier has been assigned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courier: Option<CourierModel>,
    pub state: CourierOrderState,
}

impl From<&CourierOrderRecord> for CourierOrderModel {
    fn from(record: &CourierOrderRecord) -> Self {
        Self {
            id: record.id.clone(),
            aggregate_version: record.aggregate_version,
            courier: record.courier.as_ref().map(CourierModel::from),
            state: record.state,
        }
    }
}

/// Point query for a single courier order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindCourierOrder {
    pub courier_order_id: AggregateId,
}

impl FindCourierOrder {
    pub fn new(courier_order_id: impl Into<AggregateId>) -> Self {
        Self {
            courier_order_id: courier_order_id.into(),
        }
    }
}
