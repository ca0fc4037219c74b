use thiserror::Error;

/// Errors that can occur during blob store operations.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    /// The backing store could not be reached.
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    /// The logical key is not usable by this backend.
    #[error("invalid blob key: {key}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// I/O error from a file-based backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for blob store operations.
pub type BlobStoreResult<T> = Result<T, BlobStoreError>;
