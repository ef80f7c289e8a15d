//! Keyed build cache with TTL expiry and single-flight builds.
//!
//! [`BuildCache`] stores one slot per key in a `DashMap`. Each slot is
//! guarded by a `tokio::sync::Mutex`, so concurrent callers asking for the
//! same key queue on that slot: the first one runs the builder, the rest
//! wake up to the fresh value. Different keys never block each other.
//!
//! Entries older than the TTL are rebuilt on the next request and removed by
//! [`BuildCache::sweep_expired`], which [`BuildCache::start_expiry_sweep`]
//! runs on an interval. A builder error leaves the slot without a fresh
//! value and is returned to the caller unchanged.
//!
//! Time is read through `tokio::time::Instant`, so tests can pause and
//! advance the clock.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

struct Entry<V> {
    value: Arc<V>,
    built_at: Instant,
}

struct Slot<V> {
    state: Mutex<Option<Entry<V>>>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Slot {
            state: Mutex::new(None),
        }
    }
}

/// A TTL cache whose values are produced by caller-supplied async builders.
pub struct BuildCache<K, V> {
    name: &'static str,
    slots: DashMap<K, Arc<Slot<V>>>,
    ttl: Duration,
}

impl<K, V> BuildCache<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates an empty cache. `name` only appears in log events.
    pub fn new(name: &'static str, ttl: Duration) -> Self {
        BuildCache {
            name,
            slots: DashMap::new(),
            ttl,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of slots, fresh or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Returns the cached value for `key`, building it first if it is absent
    /// or older than the TTL.
    ///
    /// At most one builder runs per key at a time.
    pub async fn get_or_build<F, Fut, E>(&self, key: K, build: F) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        loop {
            // Clone the slot out so no map shard lock is held across an await.
            let slot = Arc::clone(self.slots.entry(key.clone()).or_default().value());
            let mut state = slot.state.lock().await;

            // An invalidate or sweep may have dropped the slot while we
            // waited; building into it would go unseen by later callers.
            let current = self
                .slots
                .get(&key)
                .is_some_and(|live| Arc::ptr_eq(live.value(), &slot));
            if !current {
                continue;
            }

            if let Some(entry) = state.as_ref() {
                if entry.built_at.elapsed() < self.ttl {
                    return Ok(Arc::clone(&entry.value));
                }
            }

            let value = Arc::new(build().await?);
            *state = Some(Entry {
                value: Arc::clone(&value),
                built_at: Instant::now(),
            });
            tracing::debug!(cache = self.name, "cache entry built");
            return Ok(value);
        }
    }

    /// Drops the slot for `key`. Returns whether one existed.
    pub fn invalidate(&self, key: &K) -> bool {
        self.slots.remove(key).is_some()
    }

    /// Removes every slot whose value is missing or expired and returns how
    /// many were removed. Slots with a build in progress are kept.
    pub fn sweep_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut removed = 0;
        self.slots.retain(|_, slot| {
            let keep = match slot.state.try_lock() {
                Ok(state) => state
                    .as_ref()
                    .is_some_and(|entry| entry.built_at.elapsed() < ttl),
                Err(_) => true,
            };
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

impl<K, V> BuildCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Spawns a background task that calls [`sweep_expired`] every
    /// `interval`. The task runs until the handle is aborted or the runtime
    /// shuts down.
    ///
    /// [`sweep_expired`]: BuildCache::sweep_expired
    pub fn start_expiry_sweep(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let swept = cache.sweep_expired();
                if swept > 0 {
                    tracing::info!(cache = cache.name, swept, "swept expired cache entries");
                }
            }
        })
    }
}
