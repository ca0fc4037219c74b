//! The [`BlobStore`] trait defining the versioned-object interface.

use sqlferry_types::ContentVersionId;
use tracing::warn;

use crate::error::BlobStoreResult;
use crate::version::BlobVersion;

/// Storage backend for immutable, versioned binary objects.
///
/// Implementations must be thread-safe (`Send + Sync`). Every upload
/// produces a brand-new version with a fresh handle, even when the bytes
/// are identical to the previous version; the store does not deduplicate.
pub trait BlobStore: Send + Sync {
    /// Fetch one version of a key, or the newest when `version` is `None`.
    ///
    /// Returns `Ok(None)` when the requested version does not exist, or the
    /// key has no versions at all. Callers treat a missing pinned version as
    /// "retry unpinned", and a missing key as "resource does not exist yet".
    fn download(
        &self,
        key: &str,
        version: Option<&ContentVersionId>,
    ) -> BlobStoreResult<Option<Vec<u8>>>;

    /// Store `bytes` as a new immutable version of `key` and return its
    /// handle.
    fn upload(&self, key: &str, bytes: &[u8]) -> BlobStoreResult<ContentVersionId>;

    /// Delete one version of a key. Returns `true` if the version existed.
    ///
    /// Used to roll back an orphaned upload after a lost commit race, and by
    /// the retention janitor. Callers treat failures as best-effort.
    fn delete_version(&self, key: &str, version: &ContentVersionId) -> BlobStoreResult<bool>;

    /// Delete a batch of versions, returning how many existed.
    ///
    /// Default implementation loops [`delete_version`](Self::delete_version)
    /// and keeps going past per-version failures. Backends with a native
    /// batch delete may override.
    fn delete_versions(&self, key: &str, versions: &[ContentVersionId]) -> BlobStoreResult<usize> {
        let mut deleted = 0;
        for version in versions {
            match self.delete_version(key, version) {
                Ok(true) => deleted += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(key, version = %version.short(), error = %e, "version delete failed; continuing");
                }
            }
        }
        Ok(deleted)
    }

    /// The full version history of a key, newest first. Empty when the key
    /// has never been uploaded.
    fn list_versions(&self, key: &str) -> BlobStoreResult<Vec<BlobVersion>>;
}
