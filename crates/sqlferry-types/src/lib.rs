//! Foundation types for sqlferry.
//!
//! sqlferry lets many stateless compute instances share one SQLite-format
//! database file that lives as immutable versions in a blob store, with a
//! small version store holding the authoritative pointer to "current".
//! This crate provides the types every other sqlferry crate builds on.
//!
//! # Key Types
//!
//! - [`Domain`] — validated partition key naming one coordinated resource
//! - [`ContentVersionId`] — opaque handle to one immutable blob version
//! - [`VersionRecord`] — the authoritative pointer record (domain, version,
//!   content id, logical path)
//! - [`Fingerprint`] — domain-separated BLAKE3 digest of snapshot bytes

pub mod domain;
pub mod error;
pub mod fingerprint;
pub mod record;

pub use domain::Domain;
pub use error::TypeError;
pub use fingerprint::Fingerprint;
pub use record::{ContentVersionId, VersionRecord};
