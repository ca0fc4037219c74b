//! Domain name validation.
//!
//! A domain names one coordinated resource: one physical database file, one
//! version-record row, one blob key. Domain names appear in store keys and
//! filesystem paths, so path-hostile characters are rejected up front.
//!
//! Valid domain names:
//! - Must be non-empty
//! - Must not contain whitespace, `/`, `\`, `:`, `?`, `*`, `[`
//! - Must not contain `..` (double dot)
//! - Must not start or end with `.`

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Characters that are forbidden anywhere in a domain name.
const FORBIDDEN_CHARS: &[char] = &[' ', '\t', '\n', '\r', '/', '\\', ':', '?', '*', '['];

/// Partition key identifying one coordinated resource.
///
/// In the observed deployments this is a DNS-style name such as
/// `"example.com"`, but any string passing [`Domain::new`] validation works.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Domain(String);

impl Domain {
    /// Validate and wrap a domain name.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlferry_types::Domain;
    ///
    /// assert!(Domain::new("example.com").is_ok());
    /// assert!(Domain::new("").is_err());
    /// assert!(Domain::new("a/b").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        validate_domain_name(&name)?;
        Ok(Self(name))
    }

    /// The domain name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Domain({})", self.0)
    }
}

impl std::str::FromStr for Domain {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Validate a domain name, returning `Ok(())` if valid.
pub fn validate_domain_name(name: &str) -> Result<(), TypeError> {
    if name.is_empty() {
        return Err(TypeError::InvalidDomain {
            name: name.to_string(),
            reason: "domain name must not be empty".into(),
        });
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(TypeError::InvalidDomain {
                name: name.to_string(),
                reason: format!("contains forbidden character: {ch:?}"),
            });
        }
    }

    // Must not contain `..` (parent traversal).
    if name.contains("..") {
        return Err(TypeError::InvalidDomain {
            name: name.to_string(),
            reason: "must not contain '..'".into(),
        });
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(TypeError::InvalidDomain {
            name: name.to_string(),
            reason: "must not start or end with '.'".into(),
        });
    }

    Ok(())
}
