use thiserror::Error;

/// Errors that can occur during a retention sweep.
#[derive(Debug, Error)]
pub enum JanitorError {
    #[error("version store error: {0}")]
    Version(#[from] sqlferry_version::VersionStoreError),

    #[error("blob store error: {0}")]
    Blob(#[from] sqlferry_blob::BlobStoreError),
}

/// Convenience type alias for janitor operations.
pub type JanitorResult<T> = Result<T, JanitorError>;
