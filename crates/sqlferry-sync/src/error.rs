use thiserror::Error;

/// Errors that can occur while running a sync cycle.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Every commit attempt lost its conditional write race. The one fatal,
    /// non-recoverable outcome of the protocol; no partial commit is left
    /// behind (orphan uploads are deleted before this surfaces).
    #[error("commit retry budget exhausted after {attempts} conflicted attempts")]
    MaxRetriesExceeded { attempts: u32 },

    /// The mutation callback failed. Propagated as-is; no commit attempted.
    #[error("request handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] BootstrapError),

    /// Version store failure outside the conditional write (conflicts are
    /// handled inside the retry loop and never escape through this).
    #[error("version store error: {0}")]
    Version(#[from] sqlferry_version::VersionStoreError),

    #[error("blob store error: {0}")]
    Blob(#[from] sqlferry_blob::BlobStoreError),

    #[error("maintenance sweep error: {0}")]
    Janitor(#[from] sqlferry_janitor::JanitorError),

    /// Local working-copy I/O failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors that can occur during the one-time bootstrap path.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The administrative credential could not be fetched.
    #[error("secret store error: {reference}: {reason}")]
    Secret { reference: String, reason: String },

    /// The external application's initialization routine failed.
    #[error("resource initializer failed: {0}")]
    Initializer(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("version store error: {0}")]
    Version(#[from] sqlferry_version::VersionStoreError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
