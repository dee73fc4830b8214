use burrow_core::StorageError;
use thiserror::Error;

/// Result type for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;

#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// Human-readable validation failures. Never retried.
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    /// The chosen slug is already persisted — either a caller-supplied
    /// slug collided, or the allocator's non-atomic fallback raced.
    /// Retry policy, if any, belongs to the caller.
    #[error("slug already taken: {0}")]
    SlugTaken(String),

    /// Blank decode input; distinct from a lookup miss, which is an
    /// absent result rather than an error.
    #[error("no slug or URL supplied")]
    EmptyInput,

    /// The identifier allocator could not produce a value.
    #[error("identifier allocation failed: {0}")]
    Allocation(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
