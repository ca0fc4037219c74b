//! Snapshot content fingerprints.
//!
//! The coordinator fingerprints the local database file before and after
//! handing it to the application; an unchanged fingerprint means no commit
//! is attempted. The digest is BLAKE3 with a domain tag prepended so a
//! snapshot fingerprint can never collide with other hash uses.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Domain tag mixed into every fingerprint computation.
const FINGERPRINT_DOMAIN: &str = "sqlferry-snapshot-v1";

/// Domain-separated BLAKE3 digest of snapshot bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint a byte slice.
    pub fn of_bytes(data: &[u8]) -> Self {
        let mut hasher = hasher();
        hasher.update(data);
        Self(*hasher.finalize().as_bytes())
    }

    /// Fingerprint a file's contents, streaming (the snapshot may be large).
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut hasher = hasher();
        io::copy(&mut file, &mut hasher)?;
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// The raw 32-byte digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

fn hasher() -> blake3::Hasher {
    let mut hasher = blake3::Hasher::new();
    hasher.update(FINGERPRINT_DOMAIN.as_bytes());
    hasher.update(b":");
    hasher
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}
