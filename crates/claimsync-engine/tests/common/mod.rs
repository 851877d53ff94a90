//! In-memory collaborators for engine tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use claimsync_core::{
    AttributeDelta, AttributeWriter, CatalogueError, CustomerDirectory, DirectoryError,
    IdentityClaims, NotifyError, OrganizationMatch, ProviderError, UserCatalogue,
    UserCreatedNotice, UserCreatedNotifier, UserRecord,
};
use claimsync_engine::{Collaborators, EngineSettings, ProviderUserKey, ReconciliationOrchestrator};

pub const POOL: &str = "pool-1";

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeDirectory {
    entries: HashMap<String, OrganizationMatch>,
    fail: bool,
    delay: Option<Duration>,
    lookups: Mutex<Vec<String>>,
}

impl FakeDirectory {
    pub fn with(org_number: &str, institution: &str, external: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            org_number.to_string(),
            OrganizationMatch::new(Some(institution.into()), Some(external.into())),
        );
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl CustomerDirectory for FakeDirectory {
    async fn find_by_org_number(
        &self,
        org_number: &str,
    ) -> Result<Option<OrganizationMatch>, DirectoryError> {
        self.lookups.lock().unwrap().push(org_number.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(DirectoryError::Api {
                status: 502,
                message: "bad gateway".into(),
            });
        }
        Ok(self.entries.get(org_number).cloned())
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Catalogue whose reads can lag behind its writes.
#[derive(Default)]
pub struct FakeCatalogue {
    users: Mutex<HashMap<String, UserRecord>>,
    /// Number of upcoming reads that report "not found" regardless of content.
    stale_reads: AtomicUsize,
    fail_status: Option<u16>,
    delay: Option<Duration>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeCatalogue {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_user(user: UserRecord) -> Self {
        let catalogue = Self::default();
        catalogue
            .users
            .lock()
            .unwrap()
            .insert(user.federated_id.clone(), user);
        catalogue
    }

    /// A record exists, but the first read misses it.
    pub fn racing(user: UserRecord) -> Self {
        let catalogue = Self::with_user(user);
        catalogue.stale_reads.store(1, Ordering::SeqCst);
        catalogue
    }

    pub fn failing(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    pub fn slow(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| **c == "create" || **c == "update")
            .count()
    }

    pub fn stored(&self, federated_id: &str) -> Option<UserRecord> {
        self.users.lock().unwrap().get(federated_id).cloned()
    }

    async fn enter(&self, call: &'static str) -> Result<(), CatalogueError> {
        self.calls.lock().unwrap().push(call);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match self.fail_status {
            Some(status) => Err(CatalogueError::Api {
                status,
                message: "catalogue unavailable".into(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UserCatalogue for FakeCatalogue {
    async fn get_user(&self, federated_id: &str) -> Result<Option<UserRecord>, CatalogueError> {
        self.enter("get").await?;
        let stale = self
            .stale_reads
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        Ok(self.stored(federated_id))
    }

    async fn create_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError> {
        self.enter("create").await?;
        let mut users = self.users.lock().unwrap();
        if users.contains_key(&user.federated_id) {
            return Err(CatalogueError::Conflict {
                username: user.federated_id.clone(),
            });
        }
        users.insert(user.federated_id.clone(), user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError> {
        self.enter("update").await?;
        self.users
            .lock()
            .unwrap()
            .insert(user.federated_id.clone(), user.clone());
        Ok(user.clone())
    }
}

// ---------------------------------------------------------------------------
// Provider writer
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeWriter {
    fail: bool,
    writes: Mutex<Vec<(String, String, AttributeDelta)>>,
}

impl FakeWriter {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<(String, String, AttributeDelta)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl AttributeWriter for FakeWriter {
    async fn write_attributes(
        &self,
        user_pool_id: &str,
        username: &str,
        delta: &AttributeDelta,
    ) -> Result<(), ProviderError> {
        if self.fail {
            return Err(ProviderError::Rejected("UserNotFoundException".into()));
        }
        self.writes
            .lock()
            .unwrap()
            .push((user_pool_id.into(), username.into(), delta.clone()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeNotifier {
    fail: bool,
    /// Number of upcoming deliveries that fail before the notifier recovers.
    outages: AtomicUsize,
    notices: Mutex<Vec<UserCreatedNotice>>,
}

impl FakeNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn failing_times(outages: usize) -> Self {
        Self {
            outages: AtomicUsize::new(outages),
            ..Self::default()
        }
    }

    pub fn notices(&self) -> Vec<UserCreatedNotice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserCreatedNotifier for FakeNotifier {
    async fn notify_user_created(&self, notice: &UserCreatedNotice) -> Result<(), NotifyError> {
        let outage = self
            .outages
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if self.fail || outage {
            return Err(NotifyError::Exhausted {
                attempts: 3,
                last: "503".into(),
            });
        }
        self.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub struct Harness {
    pub directory: Arc<FakeDirectory>,
    pub catalogue: Arc<FakeCatalogue>,
    pub writer: Arc<FakeWriter>,
    pub notifier: Arc<FakeNotifier>,
    pub orchestrator: ReconciliationOrchestrator,
}

impl Harness {
    pub fn new(directory: FakeDirectory, catalogue: FakeCatalogue) -> Self {
        Self::build(
            directory,
            catalogue,
            FakeWriter::default(),
            FakeNotifier::default(),
            test_settings(),
        )
    }

    pub fn build(
        directory: FakeDirectory,
        catalogue: FakeCatalogue,
        writer: FakeWriter,
        notifier: FakeNotifier,
        settings: EngineSettings,
    ) -> Self {
        let directory = Arc::new(directory);
        let catalogue = Arc::new(catalogue);
        let writer = Arc::new(writer);
        let notifier = Arc::new(notifier);
        let orchestrator = ReconciliationOrchestrator::new(
            &settings,
            Collaborators {
                directory: directory.clone(),
                catalogue: catalogue.clone(),
                writer: writer.clone(),
                notifier: notifier.clone(),
            },
        );
        Self {
            directory,
            catalogue,
            writer,
            notifier,
            orchestrator,
        }
    }
}

pub fn test_settings() -> EngineSettings {
    EngineSettings {
        lookup_timeout: Duration::from_millis(100),
        catalogue_timeout: Duration::from_millis(100),
        provider_timeout: Duration::from_millis(100),
        ..EngineSettings::default()
    }
}

pub fn key() -> ProviderUserKey {
    ProviderUserKey::new(POOL, "feide_u1")
}

pub fn claims(org_number: &str, affiliation: &str) -> IdentityClaims {
    IdentityClaims {
        given_name: "Kari".into(),
        family_name: "Nordmann".into(),
        raw_org_number: Some(org_number.into()),
        raw_affiliation: Some(affiliation.into()),
        ..IdentityClaims::new("u1")
    }
}
