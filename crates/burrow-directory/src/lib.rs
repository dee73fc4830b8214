//! The Burrow link directory: slug allocation, link creation, and both
//! lookup directions over a durable store and a key-value cache.
//!
//! The directory owns the cache-aside protocol. The durable store is
//! authoritative; the cache holds the two inverse mappings
//! (`url:{url} -> slug`, `slug:{slug} -> url`) and is repopulated on
//! every successful read or write. Cache failures degrade to misses.
//!
//! # Example
//!
//! ```rust
//! use burrow_cache::InMemoryKvCache;
//! use burrow_directory::{DecodeResolver, LinkDirectory};
//! use burrow_storage::InMemoryLinkStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let directory = LinkDirectory::new(InMemoryLinkStore::new(), InMemoryKvCache::new());
//!
//! // Create (or find) a link; the first allocated slug is "a00000".
//! let link = directory.find_or_create_by_url("https://example.com").await?;
//! println!("short: {}", link.short_url("https://brw.io"));
//!
//! // Resolve a bare slug back to the original URL.
//! if let Some(url) = directory.find_by_slug(link.slug.as_str()).await? {
//!     println!("redirect to: {url}");
//! }
//!
//! // Or unwrap a full short URL.
//! let resolver = DecodeResolver::new(directory.clone());
//! if let Some(url) = resolver.find_by_url("https://brw.io/a00000").await? {
//!     println!("redirect to: {url}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod allocator;
pub mod directory;
pub mod error;
pub mod resolver;

pub use allocator::{AllocatorConfig, SequenceAllocator};
pub use directory::LinkDirectory;
pub use error::{DirectoryError, Result};
pub use resolver::DecodeResolver;
