//! The [`VersionStore`] trait defining the pointer-record interface.

use sqlferry_types::{Domain, VersionRecord};

use crate::error::VersionStoreResult;

/// Storage backend for per-domain version pointer records.
///
/// Implementations must be thread-safe (`Send + Sync`) and must make
/// `put_conditional` atomic with respect to concurrent callers: of any set
/// of writers proposing the same version, exactly one wins and the rest
/// observe `Conflict`.
pub trait VersionStore: Send + Sync {
    /// Read the current record for a domain.
    ///
    /// Returns `Ok(None)` if no record exists (equivalent to version 0).
    /// Transport failures surface as `Unavailable` and are not retried here.
    fn latest(&self, domain: &Domain) -> VersionStoreResult<Option<VersionRecord>>;

    /// Conditionally replace the record for `record.domain`.
    ///
    /// Accepts iff no record exists for the domain, or the stored version is
    /// at most `expected_version`, i.e. strictly less than the proposed
    /// `record.version` (which committers always compute as
    /// `expected_version + 1`). This is deliberately weaker than a strict
    /// compare-and-swap: a writer whose observed base is *ahead* of the
    /// stored record still wins. It matches the conditional update the
    /// original metadata store enforced and is sufficient for
    /// single-winner-per-round: two writers racing from the same base both
    /// propose `base + 1`, the store accepts the first and rejects the
    /// second with [`Conflict`](crate::VersionStoreError::Conflict).
    fn put_conditional(
        &self,
        record: &VersionRecord,
        expected_version: u64,
    ) -> VersionStoreResult<()>;

    /// Delete every record for a domain. Maintenance only (bootstrap/reset);
    /// never part of ordinary operation. Returns the number removed.
    fn clear(&self, domain: &Domain) -> VersionStoreResult<u64>;
}
