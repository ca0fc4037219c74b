//! In-memory version store for testing and ephemeral use.
//!
//! [`InMemoryVersionStore`] keeps all records in a `HashMap` behind a
//! `RwLock`. The write lock spans the whole read-check-write of
//! `put_conditional`, so the conditional replacement is atomic with respect
//! to concurrent callers.

use std::collections::HashMap;
use std::sync::RwLock;

use sqlferry_types::{Domain, VersionRecord};
use tracing::debug;

use crate::error::{VersionStoreError, VersionStoreResult};
use crate::traits::VersionStore;

/// An in-memory implementation of [`VersionStore`].
///
/// Data is lost when the store is dropped. This is the substitute backend
/// the coordinator tests inject in place of the deployment store.
#[derive(Debug, Default)]
pub struct InMemoryVersionStore {
    records: RwLock<HashMap<Domain, VersionRecord>>,
}

impl InMemoryVersionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of domains with a record.
    pub fn len(&self) -> usize {
        self.records.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no domain has a record.
    pub fn is_empty(&self) -> bool {
        self.records.read().expect("lock poisoned").is_empty()
    }
}

impl VersionStore for InMemoryVersionStore {
    fn latest(&self, domain: &Domain) -> VersionStoreResult<Option<VersionRecord>> {
        let records = self.records.read().expect("lock poisoned");
        Ok(records.get(domain).cloned())
    }

    fn put_conditional(
        &self,
        record: &VersionRecord,
        expected_version: u64,
    ) -> VersionStoreResult<()> {
        let mut records = self.records.write().expect("lock poisoned");
        if let Some(stored) = records.get(&record.domain) {
            if stored.version > expected_version {
                return Err(VersionStoreError::Conflict {
                    stored: stored.version,
                    proposed: record.version,
                });
            }
        }
        debug!(
            domain = %record.domain,
            version = record.version,
            content_id = %record.content_id.short(),
            "version record accepted"
        );
        records.insert(record.domain.clone(), record.clone());
        Ok(())
    }

    fn clear(&self, domain: &Domain) -> VersionStoreResult<u64> {
        let mut records = self.records.write().expect("lock poisoned");
        Ok(u64::from(records.remove(domain).is_some()))
    }
}
