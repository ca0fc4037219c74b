//! Authoritative version-pointer storage for sqlferry.
//!
//! The version store holds at most one [`VersionRecord`](sqlferry_types::VersionRecord)
//! per domain and exposes exactly one coordination primitive: a conditional
//! replacement that accepts a proposed record only if the stored version is
//! older. Every writer race in the system is resolved here; there is no
//! other lock anywhere.
//!
//! # Backends
//!
//! All backends implement the [`VersionStore`] trait:
//!
//! - [`InMemoryVersionStore`] — `HashMap`-based store for tests and embedding
//! - [`FsVersionStore`] — one JSON document per domain under a root
//!   directory, backing the operator CLI
//!
//! # Design Rules
//!
//! 1. Records are replaced only through `put_conditional`, never blind-written.
//! 2. A rejected conditional write is an expected outcome (`Conflict`), not
//!    a transport failure; callers retry, the store does not.
//! 3. Transport failures are propagated immediately and never retried here.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{VersionStoreError, VersionStoreResult};
pub use fs::FsVersionStore;
pub use memory::InMemoryVersionStore;
pub use traits::VersionStore;
