use async_trait::async_trait;
use burrow_core::{CacheError, KvCache};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::Result;

/// In-memory implementation of [`KvCache`] backed by a DashMap.
///
/// Clones share the same underlying map. The increment primitive is
/// atomic per key because the entry API holds the shard lock for the
/// whole read-modify-write; switching it off with
/// [`without_atomic_increment`](Self::without_atomic_increment) makes
/// `incr` report `Unsupported`, which exercises the allocator's
/// non-atomic fallback in tests and single-process deployments.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKvCache {
    entries: Arc<DashMap<String, String>>,
    atomic_increment_disabled: bool,
}

impl InMemoryKvCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache whose `incr` reports `Unsupported`.
    pub fn without_atomic_increment() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            atomic_increment_disabled: true,
        }
    }

    /// Number of entries currently cached.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[async_trait]
impl KvCache for InMemoryKvCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|value| value.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn incr(&self, key: &str, by: i64, initial: i64) -> Result<i64> {
        if self.atomic_increment_disabled {
            return Err(CacheError::Unsupported(
                "atomic increment disabled for this cache".to_string(),
            ));
        }

        // The entry holds the shard lock, making the read-modify-write
        // atomic with respect to other callers on the same key.
        match self.entries.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current: i64 = occupied.get().parse().map_err(|_| {
                    CacheError::InvalidData(format!(
                        "counter '{}' holds a non-numeric value: '{}'",
                        key,
                        occupied.get()
                    ))
                })?;
                let next = current + by;
                occupied.insert(next.to_string());
                Ok(next)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(initial.to_string());
                Ok(initial)
            }
        }
    }
}
