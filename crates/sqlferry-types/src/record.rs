use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Domain;

/// Opaque handle to one immutable blob version.
///
/// Issued by the blob store on every upload; the version store records the
/// handle so the exact bytes behind the current pointer can be fetched
/// later. sqlferry never inspects the contents of the handle.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentVersionId(String);

impl ContentVersionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short representation for log lines (first 8 characters).
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl fmt::Display for ContentVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for ContentVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentVersionId({})", self.short())
    }
}

impl From<&str> for ContentVersionId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The authoritative pointer record for one domain.
///
/// At most one record exists per domain; history lives in the blob store,
/// not here. An absent record is equivalent to version 0. Records are only
/// ever replaced through the version store's conditional write, never
/// blind-written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    /// Partition key naming the coordinated resource.
    pub domain: Domain,
    /// Monotonically increasing per domain.
    pub version: u64,
    /// Blob store handle for the exact bytes this record points at.
    pub content_id: ContentVersionId,
    /// Logical blob key (constant per domain in the observed design).
    pub path: String,
}

impl VersionRecord {
    /// The first record for a domain, produced by the bootstrap commit.
    pub fn initial(domain: Domain, content_id: ContentVersionId, path: impl Into<String>) -> Self {
        Self {
            domain,
            version: 1,
            content_id,
            path: path.into(),
        }
    }

    /// The record that supersedes this one, pointing at freshly uploaded
    /// content.
    pub fn successor(&self, content_id: ContentVersionId) -> Self {
        Self {
            domain: self.domain.clone(),
            version: self.version + 1,
            content_id,
            path: self.path.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domain() -> Domain {
        Domain::new("example.com").unwrap()
    }

    #[test]
    fn initial_record_is_version_one() {
        let r = VersionRecord::initial(domain(), "v-abc".into(), "db.sqlite3");
        assert_eq!(r.version, 1);
        assert_eq!(r.path, "db.sqlite3");
    }

    #[test]
    fn successor_increments_and_repoints() {
        let r = VersionRecord::initial(domain(), "v-abc".into(), "db.sqlite3");
        let next = r.successor("v-def".into());
        assert_eq!(next.version, 2);
        assert_eq!(next.content_id, ContentVersionId::new("v-def"));
        assert_eq!(next.domain, r.domain);
        assert_eq!(next.path, r.path);
    }

    #[test]
    fn content_id_short_truncates() {
        let id = ContentVersionId::new("0123456789abcdef");
        assert_eq!(id.short(), "01234567");
        let tiny = ContentVersionId::new("ab");
        assert_eq!(tiny.short(), "ab");
    }

    #[test]
    fn record_serde_round_trip() {
        let r = VersionRecord::initial(domain(), "v-abc".into(), "db.sqlite3");
        let json = serde_json::to_string(&r).unwrap();
        let back: VersionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
