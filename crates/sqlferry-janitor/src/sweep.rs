//! The retention sweep and its scheduled entry point.

use serde::{Deserialize, Serialize};
use sqlferry_blob::BlobStore;
use sqlferry_types::{ContentVersionId, Domain};
use sqlferry_version::VersionStore;
use tracing::{info, warn};

use crate::error::JanitorResult;

/// How much superseded history a sweep leaves behind.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetentionConfig {
    /// Number of superseded versions to retain beyond the newest version and
    /// the current pointer.
    pub keep: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self { keep: 10 }
    }
}

/// What one sweep looked at and did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Versions listed for the key.
    pub examined: usize,
    /// Versions retained (newest, current pointer, and the keep window).
    pub retained: usize,
    /// Versions handed to the batch delete.
    pub deleted: Vec<ContentVersionId>,
}

/// Prune one key's version history.
///
/// Walks the history newest-first. The newest version and the version named
/// by `current` are always retained; of the remainder the `keep` most recent
/// survive and everything older is deleted in one batch. Never deletes the
/// `current` version, even when the pointer lags the newest upload.
pub fn sweep(
    blobs: &dyn BlobStore,
    key: &str,
    current: Option<&ContentVersionId>,
    keep: usize,
) -> JanitorResult<SweepReport> {
    let versions = blobs.list_versions(key)?;
    let examined = versions.len();

    let mut kept = 0usize;
    let mut retained = 0usize;
    let mut deleted = Vec::new();
    for version in &versions {
        if version.is_latest || Some(&version.id) == current {
            retained += 1;
        } else if kept < keep {
            kept += 1;
            retained += 1;
        } else {
            deleted.push(version.id.clone());
        }
    }

    if !deleted.is_empty() {
        blobs.delete_versions(key, &deleted)?;
    }

    info!(key, examined, retained, deleted = deleted.len(), "retention sweep complete");
    Ok(SweepReport {
        examined,
        retained,
        deleted,
    })
}

/// Scheduled maintenance entry point.
///
/// Reads the latest [`VersionRecord`](sqlferry_types::VersionRecord) for the
/// domain to learn which version must be protected, then sweeps the key. A
/// domain with no record yet is swept with no protected pointer (the newest
/// version and the keep window still survive).
pub fn run_scheduled_sweep(
    versions: &dyn VersionStore,
    blobs: &dyn BlobStore,
    domain: &Domain,
    key: &str,
    config: &RetentionConfig,
) -> JanitorResult<SweepReport> {
    let record = versions.latest(domain)?;
    if let Some(record) = &record {
        if record.path != key {
            warn!(
                domain = %domain,
                record_path = %record.path,
                key,
                "version record path does not match configured blob key"
            );
        }
    }
    let current = record.as_ref().map(|r| &r.content_id);
    sweep(blobs, key, current, config.keep)
}
