//! [`KvCache`] implementations shared across Burrow services.
//!
//! The directory treats every backend here interchangeably: reads that
//! fail degrade to a miss, and only the atomic-increment primitive
//! distinguishes backends (the [`NullKvCache`] and an
//! [`InMemoryKvCache`] with the primitive switched off report
//! `Unsupported`, exercising the allocator's documented fallback).

pub mod memory;
pub mod null;
pub mod redis;

pub use burrow_core::cache::{KvCache, Result};
pub use burrow_core::CacheError;
pub use memory::InMemoryKvCache;
pub use null::NullKvCache;
pub use redis::RedisKvCache;
