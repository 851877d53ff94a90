//! Get-or-create-or-update of the user catalogue record.
//!
//! The catalogue is eventually consistent: a lookup may miss a record whose
//! creation already landed. A create that fails with a conflict therefore
//! falls back to an update with the same payload, and the update's result is
//! taken as authoritative. Any other catalogue failure is fatal.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use claimsync_core::{
    CatalogueError, IdentityClaims, OrganizationMatch, RoleSet, UserCatalogue, UserRecord,
};
use tracing::{debug, info, instrument};

use crate::error::EnrichError;

/// Which path the reconciliation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Found and nothing claimsync manages changed; no mutation.
    Unchanged,
    /// Found and updated.
    Updated,
    /// Not found and created.
    Created,
    /// Not found, create conflicted, then updated.
    ConflictResolved,
}

impl ReconcileOutcome {
    /// Whether this invocation created the record.
    #[must_use]
    pub const fn created(self) -> bool {
        matches!(self, Self::Created)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Updated => "updated",
            Self::Created => "created",
            Self::ConflictResolved => "conflict_resolved",
        }
    }
}

impl fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub record: UserRecord,
    pub outcome: ReconcileOutcome,
}

/// Fresh record for a user the catalogue does not know yet.
#[must_use]
pub fn desired_record(
    claims: &IdentityClaims,
    org: &OrganizationMatch,
    roles: &RoleSet,
) -> UserRecord {
    UserRecord {
        federated_id: claims.federated_id.clone(),
        given_name: claims.given_name.clone(),
        family_name: claims.family_name.clone(),
        institution_id: org.institution_id.clone(),
        external_org_id: org.external_org_id.clone(),
        roles: roles.clone(),
        access_rights: Vec::new(),
    }
}

/// `existing` brought in line with the current claims.
///
/// Organization fields follow `org`; managed roles follow `derived` while
/// unmanaged roles are kept. Blank names in the claims never erase stored ones.
#[must_use]
pub fn refreshed_record(
    existing: &UserRecord,
    claims: &IdentityClaims,
    org: &OrganizationMatch,
    derived: &RoleSet,
) -> UserRecord {
    let pick = |claimed: &str, stored: &str| {
        if claimed.trim().is_empty() {
            stored.to_string()
        } else {
            claimed.to_string()
        }
    };
    UserRecord {
        federated_id: existing.federated_id.clone(),
        given_name: pick(&claims.given_name, &existing.given_name),
        family_name: pick(&claims.family_name, &existing.family_name),
        institution_id: org.institution_id.clone(),
        external_org_id: org.external_org_id.clone(),
        roles: existing.roles.merged_with(derived),
        access_rights: existing.access_rights.clone(),
    }
}

pub struct UserReconciler {
    catalogue: Arc<dyn UserCatalogue>,
    timeout: Duration,
}

impl UserReconciler {
    #[must_use]
    pub fn new(catalogue: Arc<dyn UserCatalogue>, timeout: Duration) -> Self {
        Self { catalogue, timeout }
    }

    /// Look up the current record.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::Catalogue` on any catalogue failure and
    /// `EnrichError::Timeout` when the read exceeds its deadline.
    pub async fn lookup(&self, federated_id: &str) -> Result<Option<UserRecord>, EnrichError> {
        self.call("catalogue read", self.catalogue.get_user(federated_id))
            .await
    }

    /// Look up, then create or update as needed.
    ///
    /// # Errors
    ///
    /// Same as [`Self::apply`].
    pub async fn reconcile(
        &self,
        claims: &IdentityClaims,
        org: &OrganizationMatch,
        derived: &RoleSet,
    ) -> Result<Reconciliation, EnrichError> {
        let existing = self.lookup(&claims.federated_id).await?;
        self.apply(existing, claims, org, derived).await
    }

    /// Create or update given the result of a prior [`Self::lookup`].
    ///
    /// An existing record is used as-is when `org` is unknown, so a failed
    /// organization lookup never strips a stored institution or role. Every
    /// returned record carries its roles in canonical order with `User` last,
    /// whatever order the catalogue stores them in.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::Catalogue` for every catalogue failure except a
    /// create conflict, and `EnrichError::Timeout` when a call exceeds its
    /// deadline.
    #[instrument(skip_all, fields(username = %claims.federated_id))]
    pub async fn apply(
        &self,
        existing: Option<UserRecord>,
        claims: &IdentityClaims,
        org: &OrganizationMatch,
        derived: &RoleSet,
    ) -> Result<Reconciliation, EnrichError> {
        let Some(existing) = existing else {
            return self.create(desired_record(claims, org, derived)).await;
        };

        if !org.has_institution() {
            debug!("organization unknown, keeping stored record");
            return Ok(unchanged(existing.with_normalized_roles()));
        }

        let refreshed = refreshed_record(&existing, claims, org, derived);
        if !existing.differs_from(&refreshed) {
            return Ok(unchanged(existing.with_normalized_roles()));
        }

        debug!(roles = %refreshed.roles, "updating user record");
        let record = self.update(&refreshed).await?;
        Ok(Reconciliation {
            record,
            outcome: ReconcileOutcome::Updated,
        })
    }

    async fn create(&self, desired: UserRecord) -> Result<Reconciliation, EnrichError> {
        match self
            .call("catalogue create", self.catalogue.create_user(&desired))
            .await
        {
            Ok(record) => Ok(Reconciliation {
                record: record.with_normalized_roles(),
                outcome: ReconcileOutcome::Created,
            }),
            Err(EnrichError::Catalogue(e)) if e.is_conflict() => {
                info!("user created concurrently, updating instead");
                let record = self.update(&desired).await?;
                Ok(Reconciliation {
                    record,
                    outcome: ReconcileOutcome::ConflictResolved,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn update(&self, record: &UserRecord) -> Result<UserRecord, EnrichError> {
        self.call("catalogue update", self.catalogue.update_user(record))
            .await
            .map(UserRecord::with_normalized_roles)
    }

    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, CatalogueError>>,
    ) -> Result<T, EnrichError> {
        tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| EnrichError::Timeout { operation })?
            .map_err(EnrichError::from)
    }
}

const fn unchanged(record: UserRecord) -> Reconciliation {
    Reconciliation {
        record,
        outcome: ReconcileOutcome::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimsync_core::Role;
    use pretty_assertions::assert_eq;

    fn claims() -> IdentityClaims {
        IdentityClaims {
            given_name: "Kari".into(),
            family_name: "Nordmann".into(),
            ..IdentityClaims::new("u1")
        }
    }

    fn org() -> OrganizationMatch {
        OrganizationMatch::new(Some("inst-1".into()), Some("ext-1".into()))
    }

    fn creator_user() -> RoleSet {
        [Role::creator(), Role::user()].into_iter().collect()
    }

    #[test]
    fn desired_record_copies_claims_and_org() {
        let record = desired_record(&claims(), &org(), &creator_user());
        assert_eq!(record.federated_id, "u1");
        assert_eq!(record.given_name, "Kari");
        assert_eq!(record.institution_id.as_deref(), Some("inst-1"));
        assert_eq!(record.roles.to_csv(), "Creator,User");
        assert!(record.access_rights.is_empty());
    }

    #[test]
    fn refresh_keeps_unmanaged_roles_and_access_rights() {
        let existing = UserRecord {
            roles: [Role::new("Curator"), Role::user()].into_iter().collect(),
            access_rights: vec!["APPROVE_DOI_REQUEST".into()],
            ..desired_record(&claims(), &OrganizationMatch::unknown(), &RoleSet::base())
        };
        let refreshed = refreshed_record(&existing, &claims(), &org(), &creator_user());
        assert_eq!(refreshed.roles.to_csv(), "Creator,Curator,User");
        assert_eq!(refreshed.access_rights, existing.access_rights);
        assert_eq!(refreshed.external_org_id.as_deref(), Some("ext-1"));
    }

    #[test]
    fn refresh_does_not_blank_names() {
        let existing = desired_record(&claims(), &org(), &creator_user());
        let refreshed = refreshed_record(
            &existing,
            &IdentityClaims::new("u1"),
            &org(),
            &creator_user(),
        );
        assert_eq!(refreshed.given_name, "Kari");
        assert_eq!(refreshed.family_name, "Nordmann");
        assert!(!existing.differs_from(&refreshed));
    }

    #[test]
    fn only_creation_counts_as_created() {
        assert!(ReconcileOutcome::Created.created());
        assert!(!ReconcileOutcome::ConflictResolved.created());
        assert_eq!(ReconcileOutcome::ConflictResolved.to_string(), "conflict_resolved");
    }
}
