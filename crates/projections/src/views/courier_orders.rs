//! Courier order read model: applies courier order events, answers
//! `FindCourierOrder` queries and pushes live updates to subscribers.

use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use domain::{CourierOrderEvent, CourierOrderState, DomainEvent};
use event_store::{EventEnvelope, SequenceNumber};
use tokio::sync::RwLock;

use crate::config::ProjectorConfig;
use crate::model::{CourierOrderModel, CourierOrderRecord, FindCourierOrder};
use crate::projection::{Projection, ProjectionPosition};
use crate::store::{CourierOrderStore, CourierStore, InMemoryCourierOrderStore};
use crate::subscription::{Subscription, SubscriptionRegistry};
use crate::views::CourierView;
use crate::{ProjectionError, Result};

/// Initial answer of a subscription query plus its live update feed.
pub struct SubscriptionQueryResult {
    /// The order as stored when the subscription was opened, if it exists.
    pub initial: Option<CourierOrderModel>,
    pub updates: Subscription<CourierOrderModel>,
}

/// Whether an event's sequence number lets it change the read model.
enum Sequencing {
    Apply,
    Duplicate,
}

/// What applying one event does to the read model.
enum Change {
    /// Redelivered event; nothing changes.
    Skip,
    Save {
        record: CourierOrderRecord,
        /// Whether subscribers hear about the new view.
        emit: bool,
    },
}

/// Read model view for courier orders.
///
/// Events for one order must be handed over in sequence order; events for
/// different orders may be applied concurrently. [`Projection::reset`] waits
/// for in-flight applies and blocks new ones while the store is cleared.
#[derive(Clone)]
pub struct CourierOrderView<C = CourierView, S = InMemoryCourierOrderStore> {
    orders: S,
    couriers: C,
    updates: SubscriptionRegistry<AggregateId, CourierOrderModel>,
    apply_gate: Arc<RwLock<()>>,
    position: Arc<RwLock<ProjectionPosition>>,
    config: ProjectorConfig,
}

impl<C: CourierStore> CourierOrderView<C, InMemoryCourierOrderStore> {
    /// Creates a view over an in-memory order store.
    pub fn new(couriers: C) -> Self {
        Self::with_store(
            InMemoryCourierOrderStore::new(),
            couriers,
            ProjectorConfig::default(),
        )
    }
}

impl<C: CourierStore, S: CourierOrderStore> CourierOrderView<C, S> {
    pub fn with_store(orders: S, couriers: C, config: ProjectorConfig) -> Self {
        Self {
            orders,
            couriers,
            updates: SubscriptionRegistry::new(config.subscription_buffer),
            apply_gate: Arc::new(RwLock::new(())),
            position: Arc::new(RwLock::new(ProjectionPosition::zero())),
            config,
        }
    }

    pub fn config(&self) -> &ProjectorConfig {
        &self.config
    }

    /// Answers a point query for one courier order.
    #[tracing::instrument(skip(self), fields(order_id = %query.courier_order_id))]
    pub async fn find(&self, query: &FindCourierOrder) -> Result<CourierOrderModel> {
        metrics::counter!("courier_orders_queries").increment(1);
        let record = self.load_order(&query.courier_order_id).await?;
        Ok(CourierOrderModel::from(&record))
    }

    /// Opens a subscription query: the current view plus every later update
    /// emitted for the same order.
    ///
    /// The subscription is registered before the store is read, so any
    /// update committed after this call returns reaches `updates`.
    #[tracing::instrument(skip(self), fields(order_id = %query.courier_order_id))]
    pub async fn subscribe(&self, query: &FindCourierOrder) -> Result<SubscriptionQueryResult> {
        let updates = self
            .updates
            .subscribe(query.courier_order_id.clone())
            .await;
        let initial = self
            .orders
            .find_order(&query.courier_order_id)
            .await?
            .map(|record| CourierOrderModel::from(&record));

        Ok(SubscriptionQueryResult { initial, updates })
    }

    /// Number of orders currently in the read model.
    pub async fn count(&self) -> Result<usize> {
        self.orders.order_count().await
    }

    async fn load_order(&self, order_id: &AggregateId) -> Result<CourierOrderRecord> {
        self.orders
            .find_order(order_id)
            .await?
            .ok_or_else(|| ProjectionError::order_not_found(order_id))
    }

    fn check_sequence(
        &self,
        record: &CourierOrderRecord,
        sequence: SequenceNumber,
    ) -> Result<Sequencing> {
        if !self.config.enforce_sequence {
            return Ok(Sequencing::Apply);
        }
        if sequence <= record.aggregate_version {
            return Ok(Sequencing::Duplicate);
        }
        if !record.aggregate_version.is_followed_by(sequence) {
            return Err(ProjectionError::SequenceGap {
                aggregate_id: record.id.clone(),
                expected: record.aggregate_version.next(),
                actual: sequence,
            });
        }
        Ok(Sequencing::Apply)
    }

    /// Works out what `order_event` does to the read model without writing
    /// anything.
    async fn plan(
        &self,
        order_id: &AggregateId,
        sequence: SequenceNumber,
        order_event: CourierOrderEvent,
    ) -> Result<Change> {
        match order_event {
            CourierOrderEvent::OrderCreated => {
                if let Some(existing) = self.orders.find_order(order_id).await? {
                    if let Sequencing::Duplicate = self.check_sequence(&existing, sequence)? {
                        return Ok(Change::Skip);
                    }
                    existing.state.transition_to(CourierOrderState::Created)?;
                }
                Ok(Change::Save {
                    record: CourierOrderRecord::created(order_id.clone(), sequence),
                    emit: false,
                })
            }
            CourierOrderEvent::OrderAssigned(data) => {
                let courier = self
                    .couriers
                    .find_courier(&data.courier_id)
                    .await?
                    .ok_or_else(|| ProjectionError::courier_not_found(&data.courier_id))?;
                let mut record = self.load_order(order_id).await?;
                if let Sequencing::Duplicate = self.check_sequence(&record, sequence)? {
                    return Ok(Change::Skip);
                }

                record.state = record.state.transition_to(CourierOrderState::Assigned)?;
                record.courier = Some(courier);
                record.aggregate_version = sequence;
                Ok(Change::Save { record, emit: true })
            }
            CourierOrderEvent::OrderNotAssigned => {
                let mut record = self.load_order(order_id).await?;
                if let Sequencing::Duplicate = self.check_sequence(&record, sequence)? {
                    return Ok(Change::Skip);
                }

                // State and courier stay as they are; only the position moves.
                record.aggregate_version = sequence;
                Ok(Change::Save { record, emit: true })
            }
            CourierOrderEvent::OrderDelivered => {
                let mut record = self.load_order(order_id).await?;
                if let Sequencing::Duplicate = self.check_sequence(&record, sequence)? {
                    return Ok(Change::Skip);
                }

                record.state = record.state.transition_to(CourierOrderState::Delivered)?;
                record.aggregate_version = sequence;
                Ok(Change::Save { record, emit: true })
            }
        }
    }

    /// Applies one event. Callers hold the apply gate.
    async fn apply(&self, event: &EventEnvelope) -> Result<Option<CourierOrderModel>> {
        let order_event: CourierOrderEvent = event.decode()?;

        match self
            .plan(&event.aggregate_id, event.sequence_number, order_event)
            .await?
        {
            Change::Skip => {
                tracing::debug!("duplicate event skipped");
                metrics::counter!("courier_orders_events_skipped").increment(1);
                Ok(None)
            }
            Change::Save { record, emit } => {
                self.orders.save_order(record.clone()).await?;
                Ok(emit.then(|| CourierOrderModel::from(&record)))
            }
        }
    }
}

#[async_trait]
impl<C, S> Projection for CourierOrderView<C, S>
where
    C: CourierStore,
    S: CourierOrderStore,
{
    fn name(&self) -> &'static str {
        "CourierOrderView"
    }

    #[tracing::instrument(
        skip(self, event),
        fields(
            order_id = %event.aggregate_id,
            event_type = %event.event_type,
            sequence = %event.sequence_number,
        )
    )]
    async fn handle(&self, event: &EventEnvelope) -> Result<()> {
        let update = {
            // Held until the position moves so a reset never lands in between.
            let _gate = self.apply_gate.read().await;
            let update = if event.aggregate_type == CourierOrderEvent::AGGREGATE_TYPE {
                self.apply(event).await?
            } else {
                None
            };

            let mut pos = self.position.write().await;
            *pos = pos.advance();
            update
        };

        if let Some(view) = update {
            // Store write is committed; subscribers are told afterwards.
            self.updates.emit(&event.aggregate_id, view).await;
            metrics::counter!("courier_orders_updates_emitted").increment(1);
        }

        Ok(())
    }

    async fn check(&self, event: &EventEnvelope) -> Result<()> {
        if event.aggregate_type != CourierOrderEvent::AGGREGATE_TYPE {
            return Ok(());
        }

        let order_event: CourierOrderEvent = event.decode()?;
        let _gate = self.apply_gate.read().await;
        self.plan(&event.aggregate_id, event.sequence_number, order_event)
            .await
            .map(|_| ())
    }

    async fn position(&self) -> ProjectionPosition {
        *self.position.read().await
    }

    #[tracing::instrument(skip(self))]
    async fn reset(&self) -> Result<()> {
        let _gate = self.apply_gate.write().await;
        self.orders.delete_all_orders().await?;
        *self.position.write().await = ProjectionPosition::zero();
        tracing::info!("courier order read model cleared");
        Ok(())
    }
}
