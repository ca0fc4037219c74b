//! One-time bootstrap of an empty domain.
//!
//! Runs only when the blob store holds nothing at all for the domain's key:
//! the very first invocation ever, or a full reset. The external
//! application owns resource creation (schema, migrations) and admin
//! provisioning; this module sequences those steps, fetches the
//! administrative credential from a secret store (credentials are fetched,
//! never generated here), clears stale version rows, and hands the
//! coordinator a synthetic version-0 snapshot so the cycle proceeds
//! directly to its first commit.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use sqlferry_types::{ContentVersionId, Domain};
use sqlferry_version::VersionStore;
use tracing::info;

use crate::error::BootstrapError;

/// An administrative login provisioned into the freshly created resource.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredential {
    pub username: String,
    password: String,
}

impl AdminCredential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Parse the `username:password` form secrets are stored in.
    pub fn parse(raw: &str) -> Option<Self> {
        let (username, password) = raw.split_once(':')?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self::new(username, password))
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for AdminCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredential")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of administrative credentials.
pub trait SecretStore: Send + Sync {
    /// Fetch the credential named by `reference`.
    fn fetch_admin_credential(&self, reference: &str) -> Result<AdminCredential, BootstrapError>;
}

/// Reads `username:password` from the environment variable named by the
/// reference. Stands in for the deployment secret manager.
#[derive(Debug, Default)]
pub struct EnvSecretStore;

impl SecretStore for EnvSecretStore {
    fn fetch_admin_credential(&self, reference: &str) -> Result<AdminCredential, BootstrapError> {
        let raw = std::env::var(reference).map_err(|e| BootstrapError::Secret {
            reference: reference.to_string(),
            reason: e.to_string(),
        })?;
        AdminCredential::parse(&raw).ok_or_else(|| BootstrapError::Secret {
            reference: reference.to_string(),
            reason: "expected username:password".into(),
        })
    }
}

/// Fixed credential for tests and embedding.
#[derive(Debug)]
pub struct StaticSecretStore {
    credential: AdminCredential,
}

impl StaticSecretStore {
    pub fn new(credential: AdminCredential) -> Self {
        Self { credential }
    }
}

impl SecretStore for StaticSecretStore {
    fn fetch_admin_credential(&self, _reference: &str) -> Result<AdminCredential, BootstrapError> {
        Ok(self.credential.clone())
    }
}

/// The external application's own initialization routine.
///
/// The coordinator never knows what the resource contains; creating an
/// empty-but-valid database and installing an admin identity in it are the
/// application's job, reached through this seam.
pub trait ResourceInitializer: Send + Sync {
    /// Create an empty, valid resource at `path`.
    fn create_empty(&self, path: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Install the administrative credential into the resource at `path`.
    fn provision_admin(
        &self,
        path: &Path,
        credential: &AdminCredential,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// The synthetic snapshot a bootstrap hands back: version 0, no content id,
/// so the coordinator's next commit becomes version 1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeededSnapshot {
    pub version: u64,
    pub content_id: Option<ContentVersionId>,
}

/// Sequences the one-time bootstrap of an empty domain.
pub struct BootstrapInitializer {
    initializer: Arc<dyn ResourceInitializer>,
    secrets: Arc<dyn SecretStore>,
    secret_ref: String,
}

impl BootstrapInitializer {
    pub fn new(
        initializer: Arc<dyn ResourceInitializer>,
        secrets: Arc<dyn SecretStore>,
        secret_ref: impl Into<String>,
    ) -> Self {
        Self {
            initializer,
            secrets,
            secret_ref: secret_ref.into(),
        }
    }

    /// Create the empty resource at `local_path`, provision the admin
    /// credential, clear any stale version rows for the domain, and return
    /// the synthetic base snapshot.
    pub fn run(
        &self,
        versions: &dyn VersionStore,
        domain: &Domain,
        local_path: &Path,
    ) -> Result<SeededSnapshot, BootstrapError> {
        self.initializer
            .create_empty(local_path)
            .map_err(BootstrapError::Initializer)?;

        let credential = self.secrets.fetch_admin_credential(&self.secret_ref)?;
        self.initializer
            .provision_admin(local_path, &credential)
            .map_err(BootstrapError::Initializer)?;

        // A record with no blob behind it is stale state from a wipe; the
        // first commit must start from version 0.
        let cleared = versions.clear(domain)?;
        info!(
            domain = %domain,
            admin = %credential.username,
            stale_records = cleared,
            "bootstrapped empty resource"
        );

        Ok(SeededSnapshot {
            version: 0,
            content_id: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    use sqlferry_types::VersionRecord;
    use sqlferry_version::InMemoryVersionStore;

    use super::*;

    /// Counts calls and writes marker content, standing in for the real
    /// application's migrations.
    #[derive(Default)]
    struct RecordingInitializer {
        created: AtomicU32,
        provisioned: AtomicU32,
    }

    impl ResourceInitializer for RecordingInitializer {
        fn create_empty(
            &self,
            path: &Path,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.created.fetch_add(1, Ordering::SeqCst);
            fs::write(path, b"empty-resource")?;
            Ok(())
        }

        fn provision_admin(
            &self,
            path: &Path,
            credential: &AdminCredential,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.provisioned.fetch_add(1, Ordering::SeqCst);
            let mut bytes = fs::read(path)?;
            bytes.extend_from_slice(format!("+admin:{}", credential.username).as_bytes());
            fs::write(path, bytes)?;
            Ok(())
        }
    }

    fn domain() -> Domain {
        Domain::new("example.com").unwrap()
    }

    fn initializer(init: Arc<RecordingInitializer>) -> BootstrapInitializer {
        BootstrapInitializer::new(
            init,
            Arc::new(StaticSecretStore::new(AdminCredential::new("root", "hunter2"))),
            "unused-ref",
        )
    }

    #[test]
    fn bootstrap_creates_provisions_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sqlite3");
        let versions = InMemoryVersionStore::new();

        // A stale row left over from a wiped blob store.
        let stale = VersionRecord {
            domain: domain(),
            version: 7,
            content_id: "gone".into(),
            path: "db.sqlite3".into(),
        };
        versions.put_conditional(&stale, 6).unwrap();

        let init = Arc::new(RecordingInitializer::default());
        let bootstrap = initializer(Arc::clone(&init));
        let seeded = bootstrap.run(&versions, &domain(), &path).unwrap();

        assert_eq!(seeded, SeededSnapshot { version: 0, content_id: None });
        assert_eq!(init.created.load(Ordering::SeqCst), 1);
        assert_eq!(init.provisioned.load(Ordering::SeqCst), 1);
        assert!(versions.latest(&domain()).unwrap().is_none());

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "empty-resource+admin:root");
    }

    #[test]
    fn missing_secret_fails_before_provisioning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.sqlite3");
        let versions = InMemoryVersionStore::new();

        let init = Arc::new(RecordingInitializer::default());
        let bootstrap = BootstrapInitializer::new(
            Arc::clone(&init) as Arc<dyn ResourceInitializer>,
            Arc::new(EnvSecretStore),
            "SQLFERRY_TEST_NO_SUCH_SECRET",
        );

        let err = bootstrap.run(&versions, &domain(), &path).unwrap_err();
        assert!(matches!(err, BootstrapError::Secret { .. }));
        assert_eq!(init.provisioned.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn credential_parse_accepts_colon_form() {
        let cred = AdminCredential::parse("admin:s3cret").unwrap();
        assert_eq!(cred.username, "admin");
        assert_eq!(cred.password(), "s3cret");
        assert!(AdminCredential::parse("no-colon").is_none());
        assert!(AdminCredential::parse(":empty-user").is_none());
        assert!(AdminCredential::parse("empty-pass:").is_none());
    }

    #[test]
    fn debug_output_redacts_the_password() {
        let cred = AdminCredential::new("root", "hunter2");
        let debug = format!("{cred:?}");
        assert!(debug.contains("root"));
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("hunter2"));
    }
}
