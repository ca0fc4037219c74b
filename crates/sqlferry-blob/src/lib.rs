//! Versioned blob storage for sqlferry.
//!
//! The blob store keeps every uploaded snapshot as a distinct immutable
//! version behind an opaque [`ContentVersionId`](sqlferry_types::ContentVersionId).
//! It deliberately does *not* deduplicate: every upload creates a new
//! version even for byte-identical content, exactly like the versioned
//! object store it models. Skipping redundant uploads is the coordinator's
//! job, and pruning history is the janitor's.
//!
//! # Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] — ordered in-memory version lists for tests
//! - [`FsBlobStore`] — one directory per key, one file per version
//!
//! # Design Rules
//!
//! 1. Versions are immutable once written; a key is never mutated in place.
//! 2. A missing version is `Ok(None)`, never an error; callers fall back
//!    from pinned-version to latest to bootstrap.
//! 3. Deletion is for orphan rollback and retention sweeps only.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;
pub mod version;

pub use error::{BlobStoreError, BlobStoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
pub use version::BlobVersion;
