use async_trait::async_trait;
use burrow_core::{CacheError, KvCache};
use tracing::trace;

use crate::Result;

/// A [`KvCache`] that caches nothing.
///
/// Every read is a miss, writes are dropped, and `incr` is unsupported.
/// Useful for deployments without a cache tier; the directory then reads
/// the durable store on every lookup, and allocation requires the
/// non-atomic fallback to be explicitly enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullKvCache;

impl NullKvCache {
    pub fn new() -> Self {
        NullKvCache
    }
}

#[async_trait]
impl KvCache for NullKvCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(key, "NullKvCache.get always misses");
        Ok(None)
    }

    async fn set(&self, key: &str, _value: &str) -> Result<()> {
        trace!(key, "NullKvCache.set dropped");
        Ok(())
    }

    async fn incr(&self, key: &str, _by: i64, _initial: i64) -> Result<i64> {
        Err(CacheError::Unsupported(format!(
            "NullKvCache cannot increment '{key}'"
        )))
    }
}
