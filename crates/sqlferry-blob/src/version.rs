use chrono::{DateTime, Utc};
use sqlferry_types::ContentVersionId;

/// One entry in a key's version history.
///
/// Returned by [`BlobStore::list_versions`](crate::BlobStore::list_versions),
/// newest first. `is_latest` marks the version the store would serve for an
/// unpinned download; it need not coincide with the version the
/// authoritative pointer names (the pointer can lag behind a just-uploaded
/// orphan).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobVersion {
    /// Opaque handle for this exact immutable version.
    pub id: ContentVersionId,
    /// Whether the store considers this the newest version of the key.
    pub is_latest: bool,
    /// Size of the stored bytes.
    pub size: u64,
    /// When the version was uploaded.
    pub created_at: DateTime<Utc>,
}
