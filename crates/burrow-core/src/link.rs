use crate::slug::Slug;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A persisted short link.
///
/// `id` is the store-assigned surrogate key, strictly increasing in
/// insertion order. `slug` is unique across all rows; `original_url` is
/// deliberately not unique at the storage level (dedup is an
/// application-level check in the directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub original_url: String,
    pub slug: Slug,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Link {
    /// Generates the full short URL under the given base.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.slug)
    }
}

/// The not-yet-persisted shape handed to
/// [`LinkStore::insert`](crate::repository::LinkStore::insert).
///
/// The store assigns `id` and the timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLink {
    pub original_url: String,
    pub slug: Slug,
}
