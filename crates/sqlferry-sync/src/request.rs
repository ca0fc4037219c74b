//! Request classification and per-invocation context.

use sqlferry_janitor::SweepReport;
use sqlferry_types::VersionRecord;
use uuid::Uuid;

/// What one invocation of the coordinator is being asked to do.
///
/// The closed set of request shapes the entry adapter can hand over;
/// dispatch on this enum lives in the coordinator, not in the adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyncRequest {
    /// The application will only read the snapshot. Never commits, even if
    /// the callback touches the file.
    Read,
    /// The application may mutate the snapshot; a changed fingerprint after
    /// delegation triggers the commit protocol.
    Write,
    /// Operator maintenance; no snapshot is materialized.
    Maintenance(MaintenanceCommand),
}

/// Maintenance operations reachable through the coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaintenanceCommand {
    /// Run the retention sweep for the configured domain.
    Sweep,
    /// Delete the domain's version records (full reset; testing and
    /// recovery only).
    Reset,
}

/// Read/write classification of an application request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl AccessMode {
    pub fn is_write(self) -> bool {
        matches!(self, Self::Write)
    }
}

/// Context handed to the mutation callback on every (re)play.
#[derive(Clone, Debug)]
pub struct InvocationContext {
    /// Stable id for this invocation; also names the local working copy.
    pub request_id: String,
    /// 1 on the first delegation, incremented for every conflict replay.
    pub attempt: u32,
}

impl InvocationContext {
    pub(crate) fn new() -> Self {
        Self {
            request_id: Uuid::now_v7().to_string(),
            attempt: 1,
        }
    }
}

/// What one read/write cycle did, returned alongside the callback's
/// response unchanged.
#[derive(Debug)]
pub struct CycleOutcome<R> {
    /// The mutation callback's own result, from its final (re)play.
    pub response: R,
    /// The record accepted by the commit, or `None` when no commit was
    /// attempted (read request or unchanged snapshot).
    pub committed: Option<VersionRecord>,
    /// Conflict replays performed before the cycle settled.
    pub retries: u32,
    /// Whether this cycle ran the bootstrap path.
    pub bootstrapped: bool,
}

/// Result of a maintenance dispatch.
#[derive(Clone, Debug)]
pub enum MaintenanceOutcome {
    Sweep(SweepReport),
    Reset { records_removed: u64 },
}

/// Either kind of dispatch result.
#[derive(Debug)]
pub enum DispatchOutcome<R> {
    Cycle(CycleOutcome<R>),
    Maintenance(MaintenanceOutcome),
}
