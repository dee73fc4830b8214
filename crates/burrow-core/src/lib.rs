//! Core types and traits for the Burrow link directory.
//!
//! This crate provides the shared vocabulary used by the cache, storage,
//! and directory crates: the validated [`Slug`] type, the base62 codec,
//! the [`Link`] entity, and the contracts for the durable store and the
//! key-value cache.

pub mod base62;
pub mod cache;
pub mod error;
pub mod link;
pub mod repository;
pub mod slug;

pub use cache::KvCache;
pub use error::{CacheError, CodecError, CoreError, StorageError};
pub use link::{Link, NewLink};
pub use repository::{LinkStore, ReadLinkStore};
pub use slug::Slug;
