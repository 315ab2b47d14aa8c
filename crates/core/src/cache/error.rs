use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Cache connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Cache operation failed: {0}")]
    OperationFailed(String),
    #[error("Cache operation timed out after {0} ms")]
    Timeout(u64),
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
