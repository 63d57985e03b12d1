//! Read stores backing the projections.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use common::AggregateId;
use tokio::sync::RwLock;

use crate::Result;
use crate::model::{CourierOrderRecord, CourierRecord};

/// Keyed storage for courier order records.
///
/// Implementations must be safe for concurrent use across distinct keys and
/// give read-your-writes consistency for a single key.
#[async_trait]
pub trait CourierOrderStore: Send + Sync {
    async fn find_order(&self, id: &AggregateId) -> Result<Option<CourierOrderRecord>>;

    /// Inserts or replaces the record stored under `record.id`.
    async fn save_order(&self, record: CourierOrderRecord) -> Result<()>;

    /// Removes every record. Must succeed on an empty store.
    async fn delete_all_orders(&self) -> Result<()>;

    async fn order_count(&self) -> Result<usize>;
}

/// Read-only courier lookup used when assigning orders.
#[async_trait]
pub trait CourierStore: Send + Sync {
    async fn find_courier(&self, id: &AggregateId) -> Result<Option<CourierRecord>>;
}

#[async_trait]
impl<T: CourierStore + ?Sized> CourierStore for Arc<T> {
    async fn find_courier(&self, id: &AggregateId) -> Result<Option<CourierRecord>> {
        (**self).find_courier(id).await
    }
}

/// Courier order store held in process memory.
#[derive(Clone, Default)]
pub struct InMemoryCourierOrderStore {
    orders: Arc<RwLock<HashMap<AggregateId, CourierOrderRecord>>>,
}

impl InMemoryCourierOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourierOrderStore for InMemoryCourierOrderStore {
    async fn find_order(&self, id: &AggregateId) -> Result<Option<CourierOrderRecord>> {
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn save_order(&self, record: CourierOrderRecord) -> Result<()> {
        self.orders.write().await.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete_all_orders(&self) -> Result<()> {
        self.orders.write().await.clear();
        Ok(())
    }

    async fn order_count(&self) -> Result<usize> {
        Ok(self.orders.read().await.len())
    }
}
