//! The sync coordinator: one request cycle over the shared snapshot.
//!
//! Each invocation runs the state machine
//! `Fetching → Delegating → (Unmodified | Committing) → (Done | Retrying)`:
//! resolve the current snapshot, materialize it as a private working copy,
//! hand the copy to the application's mutation callback, and, when the
//! callback changed it, commit the new bytes through the version store's
//! conditional write. A lost race deletes the orphaned upload, backs off,
//! re-fetches the now-current snapshot, and **replays the callback** before
//! trying again; retrying the commit without replaying would silently
//! discard the winning writer's changes.
//!
//! Instances share nothing but the two stores. The conditional write is the
//! only synchronization point in the system; everything else (downloads,
//! uploads, the callback itself) may run redundantly in racing instances.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use sqlferry_blob::BlobStore;
use sqlferry_janitor::run_scheduled_sweep;
use sqlferry_types::{ContentVersionId, Fingerprint, VersionRecord};
use sqlferry_version::VersionStore;
use tracing::{debug, info, warn};

use crate::bootstrap::BootstrapInitializer;
use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::request::{
    AccessMode, CycleOutcome, DispatchOutcome, InvocationContext, MaintenanceCommand,
    MaintenanceOutcome, SyncRequest,
};

/// Orchestrates one request cycle against the shared snapshot.
///
/// Stores are injected so tests (and alternative deployments) can
/// substitute backends; the coordinator itself keeps no mutable state and
/// may be shared across threads.
pub struct SyncCoordinator {
    versions: Arc<dyn VersionStore>,
    blobs: Arc<dyn BlobStore>,
    bootstrap: BootstrapInitializer,
    config: SyncConfig,
}

/// The base snapshot one fetch resolved to.
struct FetchedBase {
    /// Version the commit will build on (0 when no record exists).
    version: u64,
    /// Whether this fetch ran the bootstrap path.
    bootstrapped: bool,
}

impl SyncCoordinator {
    pub fn new(
        versions: Arc<dyn VersionStore>,
        blobs: Arc<dyn BlobStore>,
        bootstrap: BootstrapInitializer,
        config: SyncConfig,
    ) -> Self {
        Self {
            versions,
            blobs,
            bootstrap,
            config,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Entry point: dispatch one request.
    ///
    /// `Read` and `Write` run a snapshot cycle around `handler`;
    /// maintenance commands never materialize a snapshot and ignore the
    /// handler entirely.
    pub fn dispatch<R, E, F>(&self, request: SyncRequest, handler: F) -> SyncResult<DispatchOutcome<R>>
    where
        F: FnMut(&Path, &InvocationContext) -> Result<R, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        match request {
            SyncRequest::Read => self
                .run_cycle(AccessMode::Read, handler)
                .map(DispatchOutcome::Cycle),
            SyncRequest::Write => self
                .run_cycle(AccessMode::Write, handler)
                .map(DispatchOutcome::Cycle),
            SyncRequest::Maintenance(command) => self
                .run_maintenance(command)
                .map(DispatchOutcome::Maintenance),
        }
    }

    /// Run one read/write cycle: fetch, delegate, and commit if needed.
    pub fn run_cycle<R, E, F>(&self, mode: AccessMode, mut handler: F) -> SyncResult<CycleOutcome<R>>
    where
        F: FnMut(&Path, &InvocationContext) -> Result<R, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        fs::create_dir_all(&self.config.work_dir)?;
        let mut ctx = InvocationContext::new();
        let local_path = self
            .config
            .work_dir
            .join(format!("{}-{}", ctx.request_id, self.config.blob_key));
        let _cleanup = WorkGuard(local_path.clone());

        let mut backoff = self.config.backoff();
        let mut retries = 0u32;
        let mut bootstrapped = false;

        loop {
            // Fetching.
            let base = self.fetch_snapshot(&local_path)?;
            bootstrapped |= base.bootstrapped;

            // Delegating.
            let before = Fingerprint::of_file(&local_path)?;
            let response =
                handler(&local_path, &ctx).map_err(|e| SyncError::Handler(e.into()))?;
            let after = Fingerprint::of_file(&local_path)?;

            // Unmodified: nothing to publish. A bootstrap cycle always
            // commits: the seeded empty resource must be persisted as
            // version 1 or the next cold invocation would bootstrap again.
            let must_commit = base.bootstrapped || (mode.is_write() && before != after);
            if !must_commit {
                debug!(
                    domain = %self.config.domain,
                    version = base.version,
                    changed = (before != after),
                    "skipping commit"
                );
                return Ok(CycleOutcome {
                    response,
                    committed: None,
                    retries,
                    bootstrapped,
                });
            }

            // Committing.
            let bytes = fs::read(&local_path)?;
            let content_id = self.blobs.upload(&self.config.blob_key, &bytes)?;
            let record = VersionRecord {
                domain: self.config.domain.clone(),
                version: base.version + 1,
                content_id: content_id.clone(),
                path: self.config.blob_key.clone(),
            };

            match self.versions.put_conditional(&record, base.version) {
                Ok(()) => {
                    info!(
                        domain = %record.domain,
                        version = record.version,
                        content_id = %record.content_id.short(),
                        retries,
                        "commit accepted"
                    );
                    return Ok(CycleOutcome {
                        response,
                        committed: Some(record),
                        retries,
                        bootstrapped,
                    });
                }
                Err(e) if e.is_conflict() => {
                    warn!(
                        domain = %record.domain,
                        proposed = record.version,
                        attempt = ctx.attempt,
                        "commit lost conditional write race"
                    );
                    self.discard_orphan(&content_id);

                    retries += 1;
                    if retries >= self.config.max_retries {
                        return Err(SyncError::MaxRetriesExceeded { attempts: retries });
                    }

                    let delay = backoff.next_delay();
                    debug!(delay_ms = delay.as_millis() as u64, "backing off before replay");
                    thread::sleep(delay);
                    ctx.attempt += 1;
                    // Retrying: re-enter Fetching and replay the mutation
                    // against the fresh snapshot.
                }
                Err(e) => {
                    self.discard_orphan(&content_id);
                    return Err(e.into());
                }
            }
        }
    }

    /// Run a maintenance command.
    pub fn run_maintenance(&self, command: MaintenanceCommand) -> SyncResult<MaintenanceOutcome> {
        match command {
            MaintenanceCommand::Sweep => {
                let report = run_scheduled_sweep(
                    self.versions.as_ref(),
                    self.blobs.as_ref(),
                    &self.config.domain,
                    &self.config.blob_key,
                    &self.config.retention,
                )?;
                Ok(MaintenanceOutcome::Sweep(report))
            }
            MaintenanceCommand::Reset => {
                let records_removed = self.versions.clear(&self.config.domain)?;
                info!(
                    domain = %self.config.domain,
                    records_removed,
                    "version records cleared"
                );
                Ok(MaintenanceOutcome::Reset { records_removed })
            }
        }
    }

    /// Resolve the current snapshot into `local_path`.
    ///
    /// Fallback chain: the record's pinned version → the unpinned newest →
    /// bootstrap. A record pointing at a missing version happens when a
    /// sweep raced a stale pointer read; the unpinned fetch still serves
    /// usable bytes.
    fn fetch_snapshot(&self, local_path: &Path) -> SyncResult<FetchedBase> {
        let key = &self.config.blob_key;
        let record = self.versions.latest(&self.config.domain)?;
        let version = record.as_ref().map_or(0, |r| r.version);

        if let Some(record) = &record {
            if let Some(bytes) = self.blobs.download(key, Some(&record.content_id))? {
                debug!(
                    domain = %self.config.domain,
                    version,
                    content_id = %record.content_id.short(),
                    size = bytes.len(),
                    "fetched pinned snapshot"
                );
                fs::write(local_path, bytes)?;
                return Ok(FetchedBase {
                    version,
                    bootstrapped: false,
                });
            }
            warn!(
                domain = %self.config.domain,
                version,
                content_id = %record.content_id.short(),
                "pinned version missing; falling back to newest"
            );
        }

        if let Some(bytes) = self.blobs.download(key, None)? {
            debug!(
                domain = %self.config.domain,
                version,
                size = bytes.len(),
                "fetched newest snapshot"
            );
            fs::write(local_path, bytes)?;
            return Ok(FetchedBase {
                version,
                bootstrapped: false,
            });
        }

        let seeded = self
            .bootstrap
            .run(self.versions.as_ref(), &self.config.domain, local_path)?;
        Ok(FetchedBase {
            version: seeded.version,
            bootstrapped: true,
        })
    }

    /// Best-effort rollback of an upload that lost its commit race.
    fn discard_orphan(&self, content_id: &ContentVersionId) {
        match self
            .blobs
            .delete_version(&self.config.blob_key, content_id)
        {
            Ok(_) => debug!(content_id = %content_id.short(), "orphan version deleted"),
            Err(e) => warn!(
                content_id = %content_id.short(),
                error = %e,
                "orphan version delete failed"
            ),
        }
    }
}

/// Removes the per-invocation working copy when the cycle ends, however it
/// ends.
struct WorkGuard(PathBuf);

impl Drop for WorkGuard {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use sqlferry_blob::InMemoryBlobStore;
    use sqlferry_types::Domain;
    use sqlferry_version::InMemoryVersionStore;

    use crate::bootstrap::{
        AdminCredential, ResourceInitializer, SecretStore, StaticSecretStore,
    };
    use crate::request::MaintenanceCommand;

    use super::*;

    const KEY: &str = "db.sqlite3";

    /// Stands in for the application's migrations: creates a marker file
    /// and counts invocations so tests can assert bootstrap happened once.
    #[derive(Default)]
    struct SeedInitializer {
        created: AtomicU32,
    }

    impl ResourceInitializer for SeedInitializer {
        fn create_empty(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            fs::write(path, b"seed\n")?;
            Ok(())
        }

        fn provision_admin(
            &self,
            path: &Path,
            credential: &AdminCredential,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            append(path, &format!("admin={}\n", credential.username));
            Ok(())
        }
    }

    fn append(path: &Path, line: &str) {
        let mut bytes = fs::read(path).unwrap_or_default();
        bytes.extend_from_slice(line.as_bytes());
        fs::write(path, bytes).unwrap();
    }

    struct Rig {
        versions: Arc<InMemoryVersionStore>,
        blobs: Arc<InMemoryBlobStore>,
        seeder: Arc<SeedInitializer>,
        coordinator: Arc<SyncCoordinator>,
        _work: tempfile::TempDir,
    }

    fn rig() -> Rig {
        rig_with(|config| {
            config.max_retries = 5;
        })
    }

    fn rig_with(tweak: impl FnOnce(&mut SyncConfig)) -> Rig {
        let work = tempfile::tempdir().unwrap();
        let mut config = SyncConfig {
            domain: Domain::new("example.com").unwrap(),
            work_dir: work.path().to_path_buf(),
            backoff_seed_ms: (0, 1),
            ..Default::default()
        };
        tweak(&mut config);

        let versions = Arc::new(InMemoryVersionStore::new());
        let blobs = Arc::new(InMemoryBlobStore::new());
        let seeder = Arc::new(SeedInitializer::default());
        let bootstrap = BootstrapInitializer::new(
            Arc::clone(&seeder) as Arc<dyn ResourceInitializer>,
            Arc::new(StaticSecretStore::new(AdminCredential::new("root", "hunter2")))
                as Arc<dyn SecretStore>,
            config.admin_secret_ref.clone(),
        );
        let coordinator = Arc::new(SyncCoordinator::new(
            Arc::clone(&versions) as Arc<dyn VersionStore>,
            Arc::clone(&blobs) as Arc<dyn BlobStore>,
            bootstrap,
            config,
        ));
        Rig {
            versions,
            blobs,
            seeder,
            coordinator,
            _work: work,
        }
    }

    fn noop(_: &Path, _: &InvocationContext) -> Result<(), String> {
        Ok(())
    }

    fn current_version(rig: &Rig) -> u64 {
        rig.versions
            .latest(&Domain::new("example.com").unwrap())
            .unwrap()
            .map_or(0, |r| r.version)
    }

    #[test]
    fn cold_start_bootstraps_and_commits_version_one() {
        let rig = rig();
        let outcome = rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        assert!(outcome.bootstrapped);
        assert_eq!(outcome.retries, 0);
        let committed = outcome.committed.unwrap();
        assert_eq!(committed.version, 1);

        // The seeded resource is what got published.
        let bytes = rig
            .blobs
            .download(KEY, Some(&committed.content_id))
            .unwrap()
            .unwrap();
        assert_eq!(bytes, b"seed\nadmin=root\n");
        assert_eq!(rig.seeder.created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn second_invocation_skips_bootstrap() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let outcome = rig
            .coordinator
            .run_cycle(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                append(path, "change\n");
                Ok::<_, String>(())
            })
            .unwrap();

        assert!(!outcome.bootstrapped);
        assert_eq!(outcome.committed.unwrap().version, 2);
        // Exactly one bootstrap across both invocations.
        assert_eq!(rig.seeder.created.load(Ordering::SeqCst), 1);
        assert_eq!(rig.blobs.version_count(KEY), 2);
    }

    #[test]
    fn read_request_never_commits_even_if_the_file_changes() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        let versions_before = rig.blobs.version_count(KEY);

        // SQLite-style incidental writes during a read request.
        let outcome = rig
            .coordinator
            .run_cycle(AccessMode::Read, |path: &Path, _: &InvocationContext| {
                append(path, "page-touch\n");
                Ok::<_, String>(())
            })
            .unwrap();

        assert!(outcome.committed.is_none());
        assert_eq!(rig.blobs.version_count(KEY), versions_before);
        assert_eq!(current_version(&rig), 1);
    }

    #[test]
    fn unchanged_write_is_an_idempotent_no_op() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        let versions_before = rig.blobs.version_count(KEY);

        let outcome = rig.coordinator.run_cycle(AccessMode::Write, noop).unwrap();

        assert!(outcome.committed.is_none());
        assert_eq!(outcome.retries, 0);
        assert_eq!(rig.blobs.version_count(KEY), versions_before);
        assert_eq!(current_version(&rig), 1);
    }

    #[test]
    fn changed_write_commits_the_successor() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let outcome = rig
            .coordinator
            .run_cycle(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                append(path, "row\n");
                Ok::<_, String>("response")
            })
            .unwrap();

        assert_eq!(outcome.response, "response");
        let committed = outcome.committed.unwrap();
        assert_eq!(committed.version, 2);
        let bytes = rig
            .blobs
            .download(KEY, Some(&committed.content_id))
            .unwrap()
            .unwrap();
        assert!(bytes.ends_with(b"row\n"));
    }

    #[test]
    fn handler_error_propagates_without_a_commit() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        let versions_before = rig.blobs.version_count(KEY);

        let err = rig
            .coordinator
            .run_cycle::<(), _, _>(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                append(path, "half-done\n");
                Err("application exploded".to_string())
            })
            .unwrap_err();

        assert!(matches!(err, SyncError::Handler(_)));
        assert_eq!(rig.blobs.version_count(KEY), versions_before);
        assert_eq!(current_version(&rig), 1);
    }

    #[test]
    fn conflict_replays_the_mutation_on_the_fresh_base() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let versions = Arc::clone(&rig.versions);
        let blobs = Arc::clone(&rig.blobs);
        let attempts = AtomicU32::new(0);

        let outcome = rig
            .coordinator
            .run_cycle(AccessMode::Write, |path: &Path, ctx: &InvocationContext| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                assert_eq!(ctx.attempt, attempt);
                if attempt == 1 {
                    // A racing instance lands its commit between our fetch
                    // and our conditional write.
                    let mut bytes = blobs.download(KEY, None).unwrap().unwrap();
                    bytes.extend_from_slice(b"winner\n");
                    let content_id = blobs.upload(KEY, &bytes).unwrap();
                    let record = VersionRecord {
                        domain: Domain::new("example.com").unwrap(),
                        version: 2,
                        content_id,
                        path: KEY.into(),
                    };
                    versions.put_conditional(&record, 1).unwrap();
                }
                append(path, "loser\n");
                Ok::<_, String>(())
            })
            .unwrap();

        assert_eq!(outcome.retries, 1);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        let committed = outcome.committed.unwrap();
        assert_eq!(committed.version, 3);

        // The replay ran on the winner's content: both changes survive.
        let bytes = rig
            .blobs
            .download(KEY, Some(&committed.content_id))
            .unwrap()
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("winner\n"));
        assert!(text.contains("loser\n"));

        // One version per successful commit; the orphan from the lost race
        // was deleted.
        assert_eq!(rig.blobs.version_count(KEY), 3);
    }

    #[test]
    fn retry_exhaustion_fails_and_leaves_no_orphans() {
        let rig = rig_with(|config| {
            config.max_retries = 3;
        });
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let versions = Arc::clone(&rig.versions);
        let blobs = Arc::clone(&rig.blobs);

        let err = rig
            .coordinator
            .run_cycle::<(), _, _>(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                // Every attempt loses: a competitor commits after our fetch.
                let current = versions
                    .latest(&Domain::new("example.com").unwrap())
                    .unwrap()
                    .unwrap();
                let content_id = blobs.upload(KEY, b"competitor\n").unwrap();
                versions
                    .put_conditional(&current.successor(content_id), current.version)
                    .unwrap();
                append(path, "never-lands\n");
                Ok::<_, String>(())
            })
            .unwrap_err();

        assert!(matches!(err, SyncError::MaxRetriesExceeded { attempts: 3 }));
        // Bootstrap commit + three competitor commits; every orphan upload
        // of ours was rolled back.
        assert_eq!(rig.blobs.version_count(KEY), 4);
        assert_eq!(current_version(&rig), 4);
    }

    #[test]
    fn pinned_version_missing_falls_back_to_newest() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        rig.coordinator
            .run_cycle(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                append(path, "v2\n");
                Ok::<_, String>(())
            })
            .unwrap();

        // A sweep racing a stale pointer read deleted the pinned version.
        let record = rig
            .versions
            .latest(&Domain::new("example.com").unwrap())
            .unwrap()
            .unwrap();
        rig.blobs.delete_version(KEY, &record.content_id).unwrap();

        let outcome = rig
            .coordinator
            .run_cycle(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                append(path, "v3\n");
                Ok::<_, String>(())
            })
            .unwrap();

        // Still based on version 2's number even though its bytes were
        // served from the newest surviving version.
        assert_eq!(outcome.committed.unwrap().version, 3);
        assert!(!outcome.bootstrapped);
    }

    #[test]
    fn example_scenario_three_invocations() {
        // First invocation: cold start, bootstrap, commit version 1.
        let rig = rig();
        let first = rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        assert!(first.bootstrapped);
        assert_eq!(first.committed.as_ref().unwrap().version, 1);

        // Third invocation fetches version 1, but a second invocation
        // commits version 2 while the third is still delegating.
        let coordinator = Arc::clone(&rig.coordinator);
        let ran_second = AtomicU32::new(0);

        let third = rig
            .coordinator
            .run_cycle(AccessMode::Write, |path: &Path, ctx: &InvocationContext| {
                if ctx.attempt == 1 && ran_second.swap(1, Ordering::SeqCst) == 0 {
                    let second = coordinator
                        .run_cycle(AccessMode::Write, |p: &Path, _: &InvocationContext| {
                            append(p, "second\n");
                            Ok::<_, String>(())
                        })
                        .unwrap();
                    assert_eq!(second.committed.unwrap().version, 2);
                }
                append(path, "third\n");
                Ok::<_, String>(())
            })
            .unwrap();

        // The third invocation observed a conflict, replayed on version 2's
        // content, and committed version 3 with both mutations.
        assert_eq!(third.retries, 1);
        let committed = third.committed.unwrap();
        assert_eq!(committed.version, 3);
        let text = String::from_utf8(
            rig.blobs
                .download(KEY, Some(&committed.content_id))
                .unwrap()
                .unwrap(),
        )
        .unwrap();
        assert!(text.contains("second\n"));
        assert!(text.contains("third\n"));
        assert_eq!(rig.blobs.version_count(KEY), 3);
    }

    #[test]
    fn concurrent_writers_all_land_with_replay() {
        let rig = rig_with(|config| {
            config.max_retries = 32;
            config.backoff_seed_ms = (1, 2);
        });
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let coordinator = Arc::clone(&rig.coordinator);
                std::thread::spawn(move || {
                    coordinator
                        .run_cycle(AccessMode::Write, move |path: &Path, _: &InvocationContext| {
                            append(path, &format!("writer-{i}\n"));
                            Ok::<_, String>(())
                        })
                        .unwrap()
                })
            })
            .collect();

        let outcomes: Vec<_> = handles
            .into_iter()
            .map(|h| h.join().expect("writer thread should not panic"))
            .collect();

        // Every writer eventually committed a distinct version.
        let mut versions: Vec<u64> = outcomes
            .iter()
            .map(|o| o.committed.as_ref().unwrap().version)
            .collect();
        versions.sort_unstable();
        assert_eq!(versions, vec![2, 3, 4, 5]);

        // Replay-on-conflict means no writer's change was lost: the final
        // snapshot contains every marker.
        let text = String::from_utf8(rig.blobs.download(KEY, None).unwrap().unwrap()).unwrap();
        for i in 0..4 {
            assert!(text.contains(&format!("writer-{i}\n")), "missing writer-{i}");
        }

        // One surviving version per successful commit.
        assert_eq!(rig.blobs.version_count(KEY), 5);
    }

    #[test]
    fn maintenance_sweep_dispatches_to_the_janitor() {
        let rig = rig_with(|config| {
            config.retention.keep = 1;
        });
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        for i in 0..5 {
            rig.coordinator
                .run_cycle(AccessMode::Write, |path: &Path, _: &InvocationContext| {
                    append(path, &format!("change-{i}\n"));
                    Ok::<_, String>(())
                })
                .unwrap();
        }
        assert_eq!(rig.blobs.version_count(KEY), 6);

        let outcome = rig
            .coordinator
            .dispatch(
                SyncRequest::Maintenance(MaintenanceCommand::Sweep),
                noop,
            )
            .unwrap();
        let DispatchOutcome::Maintenance(MaintenanceOutcome::Sweep(report)) = outcome else {
            panic!("expected a sweep report");
        };
        assert_eq!(report.examined, 6);
        // Newest (== current pointer) plus the keep window of one.
        assert_eq!(rig.blobs.version_count(KEY), 2);
    }

    #[test]
    fn maintenance_reset_clears_the_domain() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();

        let outcome = rig
            .coordinator
            .dispatch(
                SyncRequest::Maintenance(MaintenanceCommand::Reset),
                noop,
            )
            .unwrap();
        let DispatchOutcome::Maintenance(MaintenanceOutcome::Reset { records_removed }) = outcome
        else {
            panic!("expected a reset outcome");
        };
        assert_eq!(records_removed, 1);
        assert_eq!(current_version(&rig), 0);
    }

    #[test]
    fn working_copies_are_cleaned_up() {
        let rig = rig();
        rig.coordinator.run_cycle(AccessMode::Read, noop).unwrap();
        let leftovers = fs::read_dir(rig._work.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }
}
