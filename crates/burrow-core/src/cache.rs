use crate::error::CacheError;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A generic key-value cache with an atomic-increment primitive.
///
/// The directory stores the two inverse link mappings here
/// (`url:{url} -> slug`, `slug:{slug} -> url`) and the allocator keeps its
/// shared counter under a fixed key. The cache is never authoritative:
/// every read failure must degrade to "miss" in the caller.
#[async_trait]
pub trait KvCache: Send + Sync + 'static {
    /// Gets the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Atomically increments the integer stored under `key` by `by`,
    /// initializing it to `initial` (and returning `initial`) if the key
    /// is absent.
    ///
    /// Backends without an atomic primitive return
    /// [`CacheError::Unsupported`]; callers decide whether to fall back.
    async fn incr(&self, key: &str, by: i64, initial: i64) -> Result<i64>;
}
