//! Courier read model, looked up when orders get assigned.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{CourierEvent, DomainEvent};
use event_store::EventEnvelope;
use tokio::sync::RwLock;

use crate::Result;
use crate::model::CourierRecord;
use crate::projection::{Projection, ProjectionPosition};
use crate::store::CourierStore;

/// Read model of registered couriers.
#[derive(Clone, Default)]
pub struct CourierView {
    couriers: Arc<RwLock<HashMap<AggregateId, CourierRecord>>>,
    position: Arc<RwLock<ProjectionPosition>>,
}

impl CourierView {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_courier(&self, courier_id: &AggregateId) -> Option<CourierRecord> {
        self.couriers.read().await.get(courier_id).cloned()
    }

    pub async fn count(&self) -> usize {
        self.couriers.read().await.len()
    }
}

#[async_trait]
impl Projection for CourierView {
    fn name(&self) -> &'static str {
        "CourierView"
    }

    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        // Held until the position moves so a reset never lands in between.
        let mut couriers = self.couriers.write().await;

        if event.aggregate_type == CourierEvent::AGGREGATE_TYPE {
            match event.decode::<CourierEvent>()? {
                CourierEvent::CourierCreated(data) => {
                    let redelivered = couriers
                        .get(&event.aggregate_id)
                        .is_some_and(|c| c.aggregate_version >= event.sequence_number);
                    if redelivered {
                        tracing::debug!(courier_id = %event.aggregate_id, "duplicate courier event skipped");
                    } else {
                        couriers.insert(
                            event.aggregate_id.clone(),
                            CourierRecord {
                                id: event.aggregate_id.clone(),
                                aggregate_version: event.sequence_number,
                                first_name: data.first_name,
                                last_name: data.last_name,
                                max_number_of_active_orders: data.max_number_of_active_orders,
                            },
                        );
                    }
                }
            }
        }

        let mut pos = self.position.write().await;
        *pos = pos.advance();

        Ok(())
    }

    async fn check(&self, event: &EventEnvelope) -> Result<()> {
        if event.aggregate_type == CourierEvent::AGGREGATE_TYPE {
            event.decode::<CourierEvent>()?;
        }
        Ok(())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    async fn reset(&self) -> Result<()> {
        let mut couriers = self.couriers.write().await;
        couriers.clear();
        *self.position.write().await = ProjectionPosition::zero();
        Ok(())
    }
}

#[async_trait]
impl CourierStore for CourierView {
    async fn find_courier(&self, id: &AggregateId) -> Result<Option<CourierRecord>> {
        Ok(self.get_courier(id).await)
    }
}
