//! Identity-provider attribute synchronization.

use std::sync::Arc;
use std::time::Duration;

use claimsync_core::attributes::{
    ACCESS_RIGHTS, APPLICATION, APPLICATION_ROLES, CUSTOMER_ID, EXTERNAL_ORG_ID, IDENTIFIERS,
};
use claimsync_core::{AttributeDelta, AttributeWriter, IdentityClaims, UserRecord};
use tracing::{debug, instrument};

use crate::error::EnrichError;

/// Addresses one user in the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderUserKey {
    pub user_pool_id: String,
    pub username: String,
}

impl ProviderUserKey {
    #[must_use]
    pub fn new(user_pool_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            user_pool_id: user_pool_id.into(),
            username: username.into(),
        }
    }
}

pub struct AttributeSynchronizer {
    writer: Arc<dyn AttributeWriter>,
    identifier_prefix: String,
    application_tag: String,
    timeout: Duration,
}

impl AttributeSynchronizer {
    #[must_use]
    pub fn new(
        writer: Arc<dyn AttributeWriter>,
        identifier_prefix: impl Into<String>,
        application_tag: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            writer,
            identifier_prefix: identifier_prefix.into(),
            application_tag: application_tag.into(),
            timeout,
        }
    }

    /// Attributes to overwrite for `user`.
    ///
    /// Organization attributes are present only when known. The result
    /// depends on nothing but the two arguments and the configured constants.
    #[must_use]
    pub fn compute_delta(&self, user: &UserRecord, claims: &IdentityClaims) -> AttributeDelta {
        let mut delta = AttributeDelta::new();
        if let Some(institution) = non_blank(user.institution_id.as_deref()) {
            delta.set(CUSTOMER_ID, institution);
        }
        if let Some(external) = non_blank(user.external_org_id.as_deref()) {
            delta.set(EXTERNAL_ORG_ID, external);
        }
        delta.set(
            IDENTIFIERS,
            format!("{}{}", self.identifier_prefix, claims.federated_id),
        );
        delta.set(APPLICATION, self.application_tag.as_str());
        delta.set(APPLICATION_ROLES, user.roles.to_csv());
        delta.set(ACCESS_RIGHTS, user.access_rights.join(","));
        delta
    }

    /// Overwrite every attribute in `delta` for `key`.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::Provider` if the provider rejects the write and
    /// `EnrichError::Timeout` if it exceeds its deadline.
    #[instrument(skip_all, fields(username = %key.username, attributes = delta.len()))]
    pub async fn write(
        &self,
        key: &ProviderUserKey,
        delta: &AttributeDelta,
    ) -> Result<(), EnrichError> {
        let write = self
            .writer
            .write_attributes(&key.user_pool_id, &key.username, delta);
        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| EnrichError::Timeout {
                operation: "provider attribute write",
            })??;
        debug!("attributes written");
        Ok(())
    }

    /// Whether the caller must re-invoke after this write.
    ///
    /// True when `delta` sets an organization attribute the provider did not
    /// echo back in `claims`: tokens issued from the current event would lack
    /// it until the provider's attribute cache catches up.
    #[must_use]
    pub fn requires_retry_signal(claims: &IdentityClaims, delta: &AttributeDelta) -> bool {
        let missing = |attribute: &str, echoed: Option<&str>| {
            delta.contains(attribute) && non_blank(echoed).is_none()
        };
        missing(CUSTOMER_ID, claims.echoed_institution_id.as_deref())
            || missing(EXTERNAL_ORG_ID, claims.echoed_external_org_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
