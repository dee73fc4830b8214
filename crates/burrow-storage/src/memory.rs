use async_trait::async_trait;
use burrow_core::{Link, LinkStore, NewLink, ReadLinkStore, StorageError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use jiff::Timestamp;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::Result;

/// In-memory implementation of [`LinkStore`] using DashMap.
///
/// Rows are keyed by slug, mirroring the durable store's unique index;
/// `original_url` carries no constraint. Clones share the same storage.
/// Ids are assigned from an atomic counter, strictly increasing in
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLinkStore {
    by_slug: Arc<DashMap<String, Link>>,
    next_id: Arc<AtomicI64>,
}

impl InMemoryLinkStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted rows.
    pub fn len(&self) -> usize {
        self.by_slug.len()
    }

    /// Whether the store holds no rows.
    pub fn is_empty(&self) -> bool {
        self.by_slug.is_empty()
    }
}

#[async_trait]
impl ReadLinkStore for InMemoryLinkStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Link>> {
        Ok(self.by_slug.get(slug).map(|row| row.clone()))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<Link>> {
        // Exact, case-sensitive match; smallest id wins when the accepted
        // duplicate-URL race has produced more than one row.
        let found = self
            .by_slug
            .iter()
            .filter(|row| row.original_url == url)
            .min_by_key(|row| row.id)
            .map(|row| row.clone());
        Ok(found)
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert(&self, link: NewLink) -> Result<Link> {
        let now = Timestamp::now();
        let key = link.slug.as_str().to_owned();

        // Check-and-insert under the shard lock; the vacant entry is the
        // uniqueness constraint.
        match self.by_slug.entry(key) {
            Entry::Occupied(_) => Err(StorageError::Conflict(link.slug.to_string())),
            Entry::Vacant(vacant) => {
                let row = Link {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
                    original_url: link.original_url,
                    slug: link.slug,
                    created_at: now,
                    updated_at: now,
                };
                vacant.insert(row.clone());
                Ok(row)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_core::Slug;

    fn new_link(url: &str, slug: &str) -> NewLink {
        NewLink {
            original_url: url.to_string(),
            slug: Slug::new_unchecked(slug),
        }
    }

    #[tokio::test]
    async fn insert_and_find_by_slug() {
        let store = InMemoryLinkStore::new();

        let link = store
            .insert(new_link("https://example.com", "a00000"))
            .await
            .unwrap();
        assert_eq!(link.id, 1);

        let found = store.find_by_slug("a00000").await.unwrap().unwrap();
        assert_eq!(found.original_url, "https://example.com");
        assert_eq!(found, link);
    }

    #[tokio::test]
    async fn find_by_slug_missing() {
        let store = InMemoryLinkStore::new();
        assert!(store.find_by_slug("nothere").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_conflict_on_duplicate_slug() {
        let store = InMemoryLinkStore::new();

        store
            .insert(new_link("https://a.com", "a00000"))
            .await
            .unwrap();
        let err = store
            .insert(new_link("https://b.com", "a00000"))
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_urls_are_permitted() {
        let store = InMemoryLinkStore::new();

        store
            .insert(new_link("https://a.com", "a00000"))
            .await
            .unwrap();
        store
            .insert(new_link("https://a.com", "a00001"))
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        // Lookup resolves to the earliest row.
        let found = store.find_by_url("https://a.com").await.unwrap().unwrap();
        assert_eq!(found.slug.as_str(), "a00000");
    }

    #[tokio::test]
    async fn find_by_url_is_case_sensitive() {
        let store = InMemoryLinkStore::new();

        store
            .insert(new_link("https://example.com/Path", "a00000"))
            .await
            .unwrap();

        assert!(store
            .find_by_url("https://example.com/path")
            .await
            .unwrap()
            .is_none());
        assert!(store
            .find_by_url("https://example.com/Path")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn ids_increase_in_insertion_order() {
        let store = InMemoryLinkStore::new();

        let first = store
            .insert(new_link("https://a.com", "a00000"))
            .await
            .unwrap();
        let second = store
            .insert(new_link("https://b.com", "a00001"))
            .await
            .unwrap();
        let third = store
            .insert(new_link("https://c.com", "a00002"))
            .await
            .unwrap();

        assert!(first.id < second.id);
        assert!(second.id < third.id);
    }

    #[tokio::test]
    async fn clones_share_rows() {
        let store = InMemoryLinkStore::new();
        let view = store.clone();

        store
            .insert(new_link("https://a.com", "a00000"))
            .await
            .unwrap();

        assert_eq!(view.len(), 1);
        assert!(view.find_by_slug("a00000").await.unwrap().is_some());
    }
}
