//! [`LinkStore`] implementations: MySQL for production, in-memory for
//! unit tests and single-process deployments.

pub mod memory;
pub mod mysql;

pub use burrow_core::repository::Result;
pub use burrow_core::{LinkStore, ReadLinkStore, StorageError};
pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
