//! Sync coordination for sqlferry.
//!
//! Many stateless instances, one database file: each invocation fetches the
//! current snapshot from the blob store, lets the application mutate a
//! private working copy, and publishes the result through the version
//! store's conditional write. Losers of the write race replay their
//! mutation against the winner's snapshot and try again behind a
//! Fibonacci-shaped backoff, giving single-writer-equivalent semantics with
//! no lock anywhere.
//!
//! # Pieces
//!
//! - [`SyncCoordinator`] — the fetch/delegate/commit state machine
//! - [`SyncRequest`] — closed read/write/maintenance dispatch
//! - [`BootstrapInitializer`] — one-time seeding of an empty domain
//! - [`FibonacciBackoff`] — explicit two-delay retry schedule
//! - [`SyncConfig`] — environment-style configuration
//!
//! The stores are injected ([`VersionStore`](sqlferry_version::VersionStore),
//! [`BlobStore`](sqlferry_blob::BlobStore)), so tests swap in the in-memory
//! backends and deployments wire whatever the platform provides.

pub mod backoff;
pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod request;

pub use backoff::FibonacciBackoff;
pub use bootstrap::{
    AdminCredential, BootstrapInitializer, EnvSecretStore, ResourceInitializer, SecretStore,
    SeededSnapshot, StaticSecretStore,
};
pub use config::{ConfigError, SyncConfig};
pub use coordinator::SyncCoordinator;
pub use error::{BootstrapError, SyncError, SyncResult};
pub use request::{
    AccessMode, CycleOutcome, DispatchOutcome, InvocationContext, MaintenanceCommand,
    MaintenanceOutcome, SyncRequest,
};
