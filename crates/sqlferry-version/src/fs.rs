//! Filesystem-backed version store.
//!
//! One JSON document per domain under a root directory, written atomically
//! (write to a temp file, then persist over the target). An in-process mutex
//! serializes the read-check-write of `put_conditional`; cross-process
//! conditional atomicity is the deployment metadata store's contract, not
//! this backend's. It exists for the operator CLI and local development.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use sqlferry_types::{Domain, VersionRecord};
use tracing::debug;

use crate::error::{VersionStoreError, VersionStoreResult};
use crate::traits::VersionStore;

/// A file-per-domain implementation of [`VersionStore`].
#[derive(Debug)]
pub struct FsVersionStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsVersionStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> VersionStoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    /// The directory this store reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, domain: &Domain) -> PathBuf {
        self.root.join(format!("{domain}.json"))
    }

    fn read_record(&self, domain: &Domain) -> VersionStoreResult<Option<VersionRecord>> {
        let path = self.record_path(domain);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_slice(&data)
            .map_err(|e| VersionStoreError::Serialization(e.to_string()))?;
        Ok(Some(record))
    }

    fn write_record(&self, record: &VersionRecord) -> VersionStoreResult<()> {
        let data = serde_json::to_vec_pretty(record)
            .map_err(|e| VersionStoreError::Serialization(e.to_string()))?;
        let tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        fs::write(tmp.path(), &data)?;
        tmp.persist(self.record_path(&record.domain))
            .map_err(|e| VersionStoreError::Io(e.error))?;
        Ok(())
    }
}

impl VersionStore for FsVersionStore {
    fn latest(&self, domain: &Domain) -> VersionStoreResult<Option<VersionRecord>> {
        self.read_record(domain)
    }

    fn put_conditional(
        &self,
        record: &VersionRecord,
        expected_version: u64,
    ) -> VersionStoreResult<()> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        if let Some(stored) = self.read_record(&record.domain)? {
            if stored.version > expected_version {
                return Err(VersionStoreError::Conflict {
                    stored: stored.version,
                    proposed: record.version,
                });
            }
        }
        self.write_record(record)?;
        debug!(
            domain = %record.domain,
            version = record.version,
            "version record persisted"
        );
        Ok(())
    }

    fn clear(&self, domain: &Domain) -> VersionStoreResult<u64> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        match fs::remove_file(self.record_path(domain)) {
            Ok(()) => Ok(1),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }
}
