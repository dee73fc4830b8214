//! Disposable containers for Burrow integration tests.
//!
//! Provides throwaway Redis and MySQL servers backed by testcontainers.
//! The fixtures require a local Docker daemon; integration suites that
//! use them are `#[ignore]`d by default.

pub mod error;
pub mod mysql;
pub mod redis;

pub use error::{Result, TestInfraError};
