//! Filesystem-backed blob store.
//!
//! One directory per key, one file per version. Version files are named
//! `{seq:016x}-{uuid}`: the sequence prefix makes lexicographic filename
//! order equal upload order, and the UUIDv7 suffix keeps handles opaque and
//! collision-free. Writes go through a temp file and persist (rename), so a
//! version either exists with its full contents or not at all.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use sqlferry_types::ContentVersionId;
use tracing::debug;
use uuid::Uuid;

use crate::error::{BlobStoreError, BlobStoreResult};
use crate::traits::BlobStore;
use crate::version::BlobVersion;

/// A directory-per-key implementation of [`BlobStore`].
#[derive(Debug)]
pub struct FsBlobStore {
    root: PathBuf,
    upload_lock: Mutex<()>,
}

impl FsBlobStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> BlobStoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            upload_lock: Mutex::new(()),
        })
    }

    /// The directory this store reads and writes.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_dir(&self, key: &str) -> BlobStoreResult<PathBuf> {
        if key.is_empty() || key.contains('/') || key.contains('\\') || key.contains("..") {
            return Err(BlobStoreError::InvalidKey {
                key: key.to_string(),
                reason: "key must be a single path component".into(),
            });
        }
        Ok(self.root.join(key))
    }

    /// Version file names under a key directory, ascending upload order.
    fn version_names(&self, key: &str) -> BlobStoreResult<Vec<String>> {
        let dir = self.key_dir(key)?;
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    // Skip in-flight temp files; only `{seq:016x}-...` names
                    // are committed versions.
                    if is_version_name(name) {
                        names.push(name.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

impl BlobStore for FsBlobStore {
    fn download(
        &self,
        key: &str,
        version: Option<&ContentVersionId>,
    ) -> BlobStoreResult<Option<Vec<u8>>> {
        let names = self.version_names(key)?;
        let name = match version {
            Some(id) => {
                if !names.iter().any(|n| n == id.as_str()) {
                    return Ok(None);
                }
                id.as_str().to_string()
            }
            None => match names.last() {
                Some(name) => name.clone(),
                None => return Ok(None),
            },
        };
        match fs::read(self.key_dir(key)?.join(&name)) {
            Ok(bytes) => Ok(Some(bytes)),
            // Deleted between the listing and the read.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upload(&self, key: &str, bytes: &[u8]) -> BlobStoreResult<ContentVersionId> {
        let dir = self.key_dir(key)?;
        fs::create_dir_all(&dir)?;

        let _guard = self.upload_lock.lock().expect("lock poisoned");
        let seq = match self.version_names(key)?.last() {
            Some(name) => parse_seq(name) + 1,
            None => 0,
        };
        let name = format!("{seq:016x}-{}", Uuid::now_v7());

        let tmp = tempfile::NamedTempFile::new_in(&dir)?;
        fs::write(tmp.path(), bytes)?;
        tmp.persist(dir.join(&name))
            .map_err(|e| BlobStoreError::Io(e.error))?;

        debug!(key, version = %name, size = bytes.len(), "blob version written");
        Ok(ContentVersionId::new(name))
    }

    fn delete_version(&self, key: &str, version: &ContentVersionId) -> BlobStoreResult<bool> {
        let path = self.key_dir(key)?.join(version.as_str());
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_versions(&self, key: &str) -> BlobStoreResult<Vec<BlobVersion>> {
        let dir = self.key_dir(key)?;
        let names = self.version_names(key)?;
        let newest = names.len().saturating_sub(1);
        let mut versions = Vec::with_capacity(names.len());
        for (i, name) in names.iter().enumerate().rev() {
            let meta = match fs::metadata(dir.join(name)) {
                Ok(meta) => meta,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            let created_at: DateTime<Utc> = meta
                .modified()
                .map(DateTime::from)
                .unwrap_or_else(|_| Utc::now());
            versions.push(BlobVersion {
                id: ContentVersionId::new(name.clone()),
                is_latest: i == newest,
                size: meta.len(),
                created_at,
            });
        }
        Ok(versions)
    }
}

/// `true` for committed version file names: a 16-hex-digit sequence prefix
/// followed by `-` and the uuid suffix.
fn is_version_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 17
        && bytes[16] == b'-'
        && name[..16].chars().all(|c| c.is_ascii_hexdigit())
}

/// Parse the hex sequence prefix out of a version file name.
fn parse_seq(name: &str) -> u64 {
    name.split('-')
        .next()
        .and_then(|s| u64::from_str_radix(s, 16).ok())
        .unwrap_or(0)
}
