use thiserror::Error;

/// Errors that can occur during version store operations.
#[derive(Debug, Error)]
pub enum VersionStoreError {
    /// The conditional write was rejected: the stored record is not older
    /// than the proposed one. Expected under concurrent commits; callers
    /// retry from a fresh read.
    #[error("conditional write rejected: stored version {stored} is not older than proposed {proposed}")]
    Conflict { stored: u64, proposed: u64 },

    /// The backing store could not be reached. Propagated to the caller,
    /// never retried inside the store.
    #[error("version store unavailable: {0}")]
    Unavailable(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a file-based backend.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl VersionStoreError {
    /// `true` for the expected, retryable rejection of a conditional write.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Convenience type alias for version store operations.
pub type VersionStoreResult<T> = Result<T, VersionStoreError>;
