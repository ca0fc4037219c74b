//! In-memory blob store for testing and ephemeral use.
//!
//! [`InMemoryBlobStore`] keeps an ordered version list per key behind a
//! `RwLock`; the last element is the newest. Handles are UUIDv7 strings,
//! like the generated object keys of the store it fakes.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use sqlferry_types::ContentVersionId;
use uuid::Uuid;

use crate::error::BlobStoreResult;
use crate::traits::BlobStore;
use crate::version::BlobVersion;

#[derive(Clone, Debug)]
struct StoredVersion {
    id: ContentVersionId,
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
}

/// An in-memory implementation of [`BlobStore`].
///
/// Data is lost when the store is dropped.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    keys: RwLock<HashMap<String, Vec<StoredVersion>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of versions currently stored under `key`.
    pub fn version_count(&self, key: &str) -> usize {
        self.keys
            .read()
            .expect("lock poisoned")
            .get(key)
            .map_or(0, Vec::len)
    }

    /// Total bytes across all versions of all keys.
    pub fn total_bytes(&self) -> u64 {
        self.keys
            .read()
            .expect("lock poisoned")
            .values()
            .flatten()
            .map(|v| v.bytes.len() as u64)
            .sum()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn download(
        &self,
        key: &str,
        version: Option<&ContentVersionId>,
    ) -> BlobStoreResult<Option<Vec<u8>>> {
        let keys = self.keys.read().expect("lock poisoned");
        let Some(versions) = keys.get(key) else {
            return Ok(None);
        };
        let found = match version {
            Some(id) => versions.iter().find(|v| v.id == *id),
            None => versions.last(),
        };
        Ok(found.map(|v| v.bytes.clone()))
    }

    fn upload(&self, key: &str, bytes: &[u8]) -> BlobStoreResult<ContentVersionId> {
        let id = ContentVersionId::new(Uuid::now_v7().to_string());
        let mut keys = self.keys.write().expect("lock poisoned");
        keys.entry(key.to_string()).or_default().push(StoredVersion {
            id: id.clone(),
            bytes: bytes.to_vec(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    fn delete_version(&self, key: &str, version: &ContentVersionId) -> BlobStoreResult<bool> {
        let mut keys = self.keys.write().expect("lock poisoned");
        let Some(versions) = keys.get_mut(key) else {
            return Ok(false);
        };
        let before = versions.len();
        versions.retain(|v| v.id != *version);
        Ok(versions.len() < before)
    }

    fn list_versions(&self, key: &str) -> BlobStoreResult<Vec<BlobVersion>> {
        let keys = self.keys.read().expect("lock poisoned");
        let Some(versions) = keys.get(key) else {
            return Ok(Vec::new());
        };
        let newest = versions.len().saturating_sub(1);
        Ok(versions
            .iter()
            .enumerate()
            .rev()
            .map(|(i, v)| BlobVersion {
                id: v.id.clone(),
                is_latest: i == newest,
                size: v.bytes.len() as u64,
                created_at: v.created_at,
            })
            .collect())
    }
}
