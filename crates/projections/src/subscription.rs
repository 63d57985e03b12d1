//! Live update fan-out for subscription queries.
//!
//! Each watched key owns a broadcast channel, so an emission is a keyed
//! lookup plus a send instead of a scan over every open subscription.
//! Delivery is at-most-once and best effort: a subscriber that falls more
//! than the channel capacity behind skips the oldest updates, and nothing
//! emitted before a subscription existed is replayed to it.

use std::collections::HashMap;
use std::fmt::Display;
use std::hash::Hash;
use std::sync::{Arc, Weak};

use futures_util::Stream;
use tokio::sync::{RwLock, broadcast};

type ChannelMap<K, V> = Arc<RwLock<HashMap<K, broadcast::Sender<V>>>>;

/// Registry of open subscriptions keyed by the value they watch.
pub struct SubscriptionRegistry<K, V> {
    channels: ChannelMap<K, V>,
    capacity: usize,
}

impl<K, V> Clone for SubscriptionRegistry<K, V> {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
            capacity: self.capacity,
        }
    }
}

impl<K, V> SubscriptionRegistry<K, V>
where
    K: Eq + Hash + Clone + Display + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    /// Creates a registry buffering up to `capacity` updates per key.
    pub fn new(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Opens a subscription for updates emitted under `key`.
    ///
    /// The key's channel is removed again once its last subscription is
    /// dropped.
    pub async fn subscribe(&self, key: K) -> Subscription<V> {
        let mut channels = self.channels.write().await;
        // Channels whose last subscription was dropped while the map was busy
        channels.retain(|_, sender| sender.receiver_count() > 0);

        let receiver = channels
            .entry(key.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();

        let registry = Arc::downgrade(&self.channels);
        Subscription::new(receiver, Box::new(move || release(&registry, &key)))
    }

    /// Pushes `update` to every subscription open on `key`.
    ///
    /// Never fails: returns how many subscribers the update reached.
    pub async fn emit(&self, key: &K, update: V) -> usize {
        let channels = self.channels.read().await;
        let Some(sender) = channels.get(key) else {
            return 0;
        };

        match sender.send(update) {
            Ok(receivers) => {
                tracing::debug!(%key, receivers, "update emitted");
                metrics::counter!("subscription_updates_emitted").increment(1);
                receivers
            }
            Err(_) => {
                drop(channels);
                tracing::debug!(%key, "no live subscribers, dropping channel");
                self.prune(key).await;
                0
            }
        }
    }

    /// Number of live subscriptions on `key`.
    pub async fn subscriber_count(&self, key: &K) -> usize {
        self.channels
            .read()
            .await
            .get(key)
            .map(broadcast::Sender::receiver_count)
            .unwrap_or(0)
    }

    /// Number of keys with at least one channel open.
    pub async fn watched_keys(&self) -> usize {
        self.channels.read().await.len()
    }

    async fn prune(&self, key: &K) {
        let mut channels = self.channels.write().await;
        if channels
            .get(key)
            .is_some_and(|sender| sender.receiver_count() == 0)
        {
            channels.remove(key);
        }
    }
}

/// Drops the channel of `key` when the subscription being released is the
/// last one on it. Skipped if the map is busy; the next `subscribe` sweeps it.
fn release<K: Eq + Hash, V>(
    registry: &Weak<RwLock<HashMap<K, broadcast::Sender<V>>>>,
    key: &K,
) {
    let Some(channels) = registry.upgrade() else {
        return;
    };
    let Ok(mut channels) = channels.try_write() else {
        return;
    };
    // The releasing subscription still holds its receiver here.
    if channels
        .get(key)
        .is_some_and(|sender| sender.receiver_count() <= 1)
    {
        channels.remove(key);
    }
}

type Release = Box<dyn FnOnce() + Send + Sync>;

/// Receiving end of a subscription query.
pub struct Subscription<V> {
    receiver: broadcast::Receiver<V>,
    release: Option<Release>,
}

impl<V> Drop for Subscription<V> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl<V: Clone + Send + 'static> Subscription<V> {
    fn new(receiver: broadcast::Receiver<V>, release: Release) -> Self {
        Self {
            receiver,
            release: Some(release),
        }
    }

    /// Waits for the next update. Returns None once the registry is gone.
    pub async fn next(&mut self) -> Option<V> {
        loop {
            match self.receiver.recv().await {
                Ok(update) => return Some(update),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagged, updates dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already buffered update without waiting.
    pub fn try_next(&mut self) -> Option<V> {
        loop {
            match self.receiver.try_recv() {
                Ok(update) => return Some(update),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "subscriber lagged, updates dropped");
                }
                Err(_) => return None,
            }
        }
    }

    /// Converts the subscription into a stream of updates.
    pub fn into_stream(self) -> impl Stream<Item = V> + Send {
        futures_util::stream::unfold(self, |mut subscription| async move {
            subscription.next().await.map(|update| (update, subscription))
        })
    }
}
