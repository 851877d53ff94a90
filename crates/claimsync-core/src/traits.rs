//! Collaborator traits.
//!
//! The reconciliation engine talks to the outside world only through these
//! traits. `claimsync-clients` provides HTTP implementations; tests provide
//! in-memory fakes.

use async_trait::async_trait;

use crate::attributes::AttributeDelta;
use crate::errors::{CatalogueError, DirectoryError, NotifyError, ProviderError};
use crate::organization::OrganizationMatch;
use crate::user::{UserCreatedNotice, UserRecord};

/// Read-only lookup of organizations by (cleaned) organization number.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Look up the institution registered for `org_number`.
    ///
    /// Returns `Ok(None)` when the directory has no such organization.
    async fn find_by_org_number(
        &self,
        org_number: &str,
    ) -> Result<Option<OrganizationMatch>, DirectoryError>;
}

/// Eventually consistent user record store keyed by federated id.
#[async_trait]
pub trait UserCatalogue: Send + Sync {
    /// Fetch a record. `Ok(None)` means not found (which may be stale).
    async fn get_user(&self, federated_id: &str) -> Result<Option<UserRecord>, CatalogueError>;

    /// Create a record.
    ///
    /// Returns [`CatalogueError::Conflict`] when a record with the same key
    /// already exists.
    async fn create_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError>;

    /// Replace a record, returning the stored version.
    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError>;
}

/// Overwrite of named attributes on an identity-provider user.
#[async_trait]
pub trait AttributeWriter: Send + Sync {
    /// Replace every attribute named in `delta` for `username` in `user_pool_id`.
    async fn write_attributes(
        &self,
        user_pool_id: &str,
        username: &str,
        delta: &AttributeDelta,
    ) -> Result<(), ProviderError>;
}

/// Acknowledged delivery of new-user notifications to a secondary system.
#[async_trait]
pub trait UserCreatedNotifier: Send + Sync {
    /// Deliver `notice`, returning only once the receiver acknowledged it.
    async fn notify_user_created(&self, notice: &UserCreatedNotice) -> Result<(), NotifyError>;
}
