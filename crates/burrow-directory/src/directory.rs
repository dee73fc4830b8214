use std::sync::Arc;

use burrow_core::{base62, KvCache, Link, LinkStore, NewLink, Slug, StorageError};
use tracing::{debug, trace, warn};

use crate::allocator::{AllocatorConfig, SequenceAllocator};
use crate::error::{DirectoryError, Result};

/// Offset added to allocator output before encoding: 10 * 62^5, so the
/// first allocated slug encodes as exactly "a00000". Once the counter
/// pushes the sum past the 6-symbol range, encoding naturally widens to
/// 7+ symbols.
const SLUG_ID_OFFSET: u64 = 9_161_328_320;

/// Cache key for the URL→slug direction.
fn url_key(url: &str) -> String {
    format!("url:{url}")
}

/// Cache key for the slug→URL direction.
fn slug_key(slug: &str) -> String {
    format!("slug:{slug}")
}

/// The only component allowed to create links or translate between the
/// two lookup directions. Owns the cache-aside protocol: the durable
/// store is authoritative, the cache holds the inverse mapping pair and
/// is repopulated on every successful read or write.
pub struct LinkDirectory<S, C> {
    store: Arc<S>,
    cache: Arc<C>,
    allocator: SequenceAllocator<C>,
}

impl<S, C> Clone for LinkDirectory<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            allocator: self.allocator.clone(),
        }
    }
}

impl<S: LinkStore, C: KvCache> LinkDirectory<S, C> {
    /// Creates a directory with the default allocator configuration.
    pub fn new(store: S, cache: C) -> Self {
        Self::with_config(store, cache, AllocatorConfig::default())
    }

    /// Creates a directory with a custom allocator configuration.
    pub fn with_config(store: S, cache: C, config: AllocatorConfig) -> Self {
        let cache = Arc::new(cache);
        Self {
            store: Arc::new(store),
            allocator: SequenceAllocator::new(Arc::clone(&cache), config),
            cache,
        }
    }

    /// Finds the link for `url`, creating it with a freshly allocated
    /// slug if no row exists.
    ///
    /// Dedup is an exact, case-sensitive match on `original_url` and is
    /// purely application-level: two concurrent calls for the same URL
    /// may both miss the dedup check and both insert. Only the slug's
    /// unique index arbitrates, so duplicate rows per URL are an accepted
    /// outcome.
    pub async fn find_or_create_by_url(&self, url: &str) -> Result<Link> {
        self.find_or_create(url, None).await
    }

    /// Like [`find_or_create_by_url`](Self::find_or_create_by_url), but
    /// persists the caller-supplied slug instead of allocating one.
    /// A collision surfaces as [`DirectoryError::SlugTaken`].
    pub async fn find_or_create_by_url_with_slug(
        &self,
        url: &str,
        slug: Slug,
    ) -> Result<Link> {
        self.find_or_create(url, Some(slug)).await
    }

    async fn find_or_create(&self, url: &str, custom_slug: Option<Slug>) -> Result<Link> {
        if url.trim().is_empty() {
            return Err(DirectoryError::Validation(vec![
                "Original url can't be blank".to_string(),
            ]));
        }

        // The cached slug is a pointer, not ground truth: the
        // authoritative row is still read from the store.
        if let Some(slug) = self.cached_get(&url_key(url)).await {
            match self.store.find_by_slug(&slug).await? {
                Some(link) => {
                    debug!(url, slug = %link.slug, "resolved via cached url mapping");
                    return Ok(link);
                }
                None => {
                    warn!(url, slug = %slug, "cached slug no longer resolves, falling back to store");
                }
            }
        }

        if let Some(existing) = self.store.find_by_url(url).await? {
            debug!(url, slug = %existing.slug, "url already persisted");
            self.record_mapping(&existing).await;
            return Ok(existing);
        }

        let slug = match custom_slug {
            Some(slug) => slug,
            None => self.allocate_slug().await?,
        };

        let link = self
            .store
            .insert(NewLink {
                original_url: url.to_string(),
                slug,
            })
            .await
            .map_err(|err| match err {
                StorageError::Conflict(slug) => DirectoryError::SlugTaken(slug),
                other => DirectoryError::Storage(other),
            })?;

        debug!(url, slug = %link.slug, id = link.id, "created link");
        self.record_mapping(&link).await;
        Ok(link)
    }

    /// Resolves a slug to the original URL text.
    ///
    /// Returns the URL as a string rather than a [`Link`] — this path is
    /// deliberately asymmetric with creation, since its callers only need
    /// the redirect target.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<String>> {
        if let Some(url) = self.cached_get(&slug_key(slug)).await {
            debug!(slug, "resolved via cached slug mapping");
            return Ok(Some(url));
        }

        match self.store.find_by_slug(slug).await? {
            Some(link) => {
                self.record_mapping(&link).await;
                Ok(Some(link.original_url))
            }
            None => {
                trace!(slug, "slug not found");
                Ok(None)
            }
        }
    }

    async fn allocate_slug(&self) -> Result<Slug> {
        let id = self.allocator.next().await?;
        // Normalize against the configured initial so the very first
        // identifier lands exactly on the offset and encodes as "a00000".
        let sequence = u64::try_from(id - self.allocator.config().initial).map_err(|_| {
            DirectoryError::Allocation(format!(
                "counter produced an identifier below the initial value: {id}"
            ))
        })?;
        Ok(Slug::new_unchecked(base62::encode(SLUG_ID_OFFSET + sequence)))
    }

    /// Reads a cache key, treating empty values and failures as a miss.
    async fn cached_get(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(Some(value)) if !value.is_empty() => Some(value),
            Ok(_) => None,
            Err(err) => {
                warn!(key, error = %err, "cache read failed, treating as miss");
                None
            }
        }
    }

    /// Writes both directions of the mapping for a link just read from or
    /// written to the store. The write order is fixed (`url:` first,
    /// `slug:` second); a crash between the two leaves one direction
    /// stale, which store-backed reads tolerate. Write failures degrade
    /// to warnings — the store stays authoritative and the next read
    /// repopulates.
    async fn record_mapping(&self, link: &Link) {
        let url_entry = url_key(&link.original_url);
        if let Err(err) = self.cache.set(&url_entry, link.slug.as_str()).await {
            warn!(key = %url_entry, error = %err, "failed to cache url mapping");
        }

        let slug_entry = slug_key(link.slug.as_str());
        if let Err(err) = self.cache.set(&slug_entry, &link.original_url).await {
            warn!(key = %slug_entry, error = %err, "failed to cache slug mapping");
        }
    }
}
