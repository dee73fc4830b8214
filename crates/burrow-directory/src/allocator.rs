use std::sync::Arc;

use burrow_core::KvCache;
use tracing::{trace, warn};
use typed_builder::TypedBuilder;

use crate::error::{DirectoryError, Result};

/// Configuration for the sequential identifier allocator.
#[derive(Debug, Clone, TypedBuilder)]
pub struct AllocatorConfig {
    /// Cache key under which the shared counter lives.
    #[builder(default = "url_counter".to_string())]
    pub counter_key: String,

    /// Value handed out by the very first allocation.
    #[builder(default = 1)]
    pub initial: i64,

    /// Permits the non-atomic read-then-write path when the cache backend
    /// offers no atomic increment. The fallback is not race-free: two
    /// concurrent allocators may observe the same pre-increment value and
    /// hand out the same identifier, which later surfaces as a slug
    /// conflict at the durable store. Intended for single-process and
    /// test environments only.
    #[builder(default = false)]
    pub allow_non_atomic_fallback: bool,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Hands out globally unique, strictly increasing integers from a shared
/// counter kept in the cache.
///
/// The cache's atomic increment is the only concurrency-safe primitive in
/// the subsystem; everything above it is check-then-act.
pub struct SequenceAllocator<C> {
    cache: Arc<C>,
    config: AllocatorConfig,
}

impl<C> Clone for SequenceAllocator<C> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
        }
    }
}

impl<C: KvCache> SequenceAllocator<C> {
    pub fn new(cache: Arc<C>, config: AllocatorConfig) -> Self {
        Self { cache, config }
    }

    /// The configuration this allocator was built with.
    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    /// Returns the next identifier in the shared counter.
    pub async fn next(&self) -> Result<i64> {
        match self
            .cache
            .incr(&self.config.counter_key, 1, self.config.initial)
            .await
        {
            Ok(id) => {
                trace!(id, "allocated identifier");
                Ok(id)
            }
            Err(err) if self.config.allow_non_atomic_fallback => {
                warn!(
                    error = %err,
                    "atomic increment unavailable, using non-atomic fallback"
                );
                self.fallback_next().await
            }
            Err(err) => Err(DirectoryError::Allocation(err.to_string())),
        }
    }

    /// Read-then-write increment. Not race-free under concurrent callers.
    async fn fallback_next(&self) -> Result<i64> {
        let current = match self.cache.get(&self.config.counter_key).await {
            Ok(Some(value)) => value.parse::<i64>().map_err(|_| {
                DirectoryError::Allocation(format!(
                    "counter '{}' holds a non-numeric value: '{}'",
                    self.config.counter_key, value
                ))
            })?,
            Ok(None) => 0,
            Err(err) => return Err(DirectoryError::Allocation(err.to_string())),
        };

        let next = current + 1;
        self.cache
            .set(&self.config.counter_key, &next.to_string())
            .await
            .map_err(|err| DirectoryError::Allocation(err.to_string()))?;
        Ok(next)
    }
}
