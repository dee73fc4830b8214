use crate::error::StorageError;
use crate::link::{Link, NewLink};
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the durable link store.
///
/// This trait provides only the lookup operations from [`LinkStore`],
/// allowing components like the decode resolver to have read-only access.
#[async_trait]
pub trait ReadLinkStore: Send + Sync + 'static {
    /// Retrieves the link with the given slug, exact match.
    /// Returns `None` if no row exists.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>>;

    /// Retrieves a link whose `original_url` equals `url` exactly
    /// (case-sensitive). When duplicate rows exist for the same URL, the
    /// row with the smallest `id` is returned.
    async fn find_by_url(&self, url: &str) -> Result<Option<Link>>;
}

#[async_trait]
pub trait LinkStore: ReadLinkStore {
    /// Persists a new link, assigning its `id` and timestamps.
    ///
    /// Returns `Err(Conflict)` if the slug is already taken; the unique
    /// index on `slug` is the only constraint arbitrating races.
    async fn insert(&self, link: NewLink) -> Result<Link>;
}
