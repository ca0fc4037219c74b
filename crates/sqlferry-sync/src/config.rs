//! Coordinator configuration.
//!
//! Deployments configure the coordinator through `SQLFERRY_*` environment
//! variables (the invocation environment is the only channel a stateless
//! instance has); everything has a sensible default and a `toml` file can
//! stand in for the environment in development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlferry_janitor::RetentionConfig;
use sqlferry_types::Domain;
use thiserror::Error;

use crate::backoff::FibonacciBackoff;

/// Configuration for the sync coordinator and its maintenance dispatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Domain whose resource this instance coordinates.
    pub domain: Domain,
    /// Logical blob key of the database file.
    pub blob_key: String,
    /// Metadata table identifier, for backends that need one.
    pub table: String,
    /// Directory for per-invocation working copies.
    pub work_dir: PathBuf,
    /// Maximum commit attempts before the cycle fails.
    pub max_retries: u32,
    /// First two delays of the Fibonacci backoff schedule, in milliseconds.
    pub backoff_seed_ms: (u64, u64),
    /// Secret-store reference for the bootstrap admin credential.
    pub admin_secret_ref: String,
    /// Retention sweep settings for maintenance dispatch.
    pub retention: RetentionConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            domain: Domain::new("example.com").unwrap(),
            blob_key: "db.sqlite3".into(),
            table: "sqlferry-versions".into(),
            work_dir: env::temp_dir(),
            max_retries: 8,
            backoff_seed_ms: (25, 50),
            admin_secret_ref: "SQLFERRY_ADMIN_CREDENTIAL".into(),
            retention: RetentionConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Build a configuration from `SQLFERRY_*` environment variables,
    /// falling back to defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(domain) = env::var("SQLFERRY_DOMAIN") {
            config.domain = Domain::new(&domain).map_err(|e| ConfigError::Invalid {
                key: "SQLFERRY_DOMAIN".into(),
                reason: e.to_string(),
            })?;
        }
        if let Ok(key) = env::var("SQLFERRY_BLOB_KEY") {
            config.blob_key = key;
        }
        if let Ok(table) = env::var("SQLFERRY_TABLE") {
            config.table = table;
        }
        if let Ok(dir) = env::var("SQLFERRY_WORK_DIR") {
            config.work_dir = PathBuf::from(dir);
        }
        if let Ok(retries) = env::var("SQLFERRY_MAX_RETRIES") {
            config.max_retries = parse(&retries, "SQLFERRY_MAX_RETRIES")?;
        }
        if let Ok(seeds) = env::var("SQLFERRY_BACKOFF_SEED_MS") {
            config.backoff_seed_ms = parse_seed_pair(&seeds)?;
        }
        if let Ok(keep) = env::var("SQLFERRY_RETENTION_KEEP") {
            config.retention.keep = parse(&keep, "SQLFERRY_RETENTION_KEEP")?;
        }
        if let Ok(secret) = env::var("SQLFERRY_ADMIN_SECRET") {
            config.admin_secret_ref = secret;
        }
        Ok(config)
    }

    /// Parse a configuration from a TOML document.
    pub fn from_toml_str(doc: &str) -> Result<Self, ConfigError> {
        toml::from_str(doc).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// A fresh backoff schedule seeded from this configuration.
    pub fn backoff(&self) -> FibonacciBackoff {
        FibonacciBackoff::from_millis(self.backoff_seed_ms.0, self.backoff_seed_ms.1)
    }

    /// The seed delays as durations.
    pub fn backoff_seeds(&self) -> (Duration, Duration) {
        (
            Duration::from_millis(self.backoff_seed_ms.0),
            Duration::from_millis(self.backoff_seed_ms.1),
        )
    }
}

fn parse<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key: key.into(),
        reason: e.to_string(),
    })
}

fn parse_seed_pair(value: &str) -> Result<(u64, u64), ConfigError> {
    let invalid = || ConfigError::Invalid {
        key: "SQLFERRY_BACKOFF_SEED_MS".into(),
        reason: format!("expected \"first,second\" in milliseconds, got {value:?}"),
    };
    let (first, second) = value.split_once(',').ok_or_else(invalid)?;
    Ok((
        first.trim().parse().map_err(|_| invalid())?,
        second.trim().parse().map_err(|_| invalid())?,
    ))
}

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration value for {key}: {reason}")]
    Invalid { key: String, reason: String },

    #[error("configuration parse error: {0}")]
    Parse(String),
}
