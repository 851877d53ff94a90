use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Federation-asserted claims for one authentication event.
///
/// Produced by the inbound event model in `claimsync-engine`, consumed by every
/// reconciliation step. Immutable once built: hosted-identity overrides and
/// org-number cleaning produce derived values, they never rewrite these fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaims {
    /// Stable external username (e.g. `user@org.no`).
    pub federated_id: String,
    /// Given name, may be empty.
    pub given_name: String,
    /// Family name, may be empty.
    pub family_name: String,
    /// Organization number, possibly carrying a country-code prefix.
    pub raw_org_number: Option<String>,
    /// Bracketed, comma-delimited affiliation list (e.g. `[member, staff]`).
    pub raw_affiliation: Option<String>,
    /// Organization number supplied when the identity is hosted on behalf of another org.
    pub hosted_org_number: Option<String>,
    /// Affiliation list of the hosted identity, entries carry an `@domain` suffix.
    pub hosted_affiliation: Option<String>,
    /// Institution id echoed back by the provider from a previous enrichment.
    pub echoed_institution_id: Option<String>,
    /// External org id echoed back by the provider from a previous enrichment.
    pub echoed_external_org_id: Option<String>,
}

impl IdentityClaims {
    /// Minimal claims for a federated username; every optional field empty.
    #[must_use]
    pub fn new(federated_id: impl Into<String>) -> Self {
        Self {
            federated_id: federated_id.into(),
            ..Self::default()
        }
    }

    /// Check the invariants the reconciliation relies on.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if `federated_id` is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.federated_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "federated id must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Whether both organization fields were echoed back by the provider.
    ///
    /// When true, the organization lookup is skipped entirely.
    #[must_use]
    pub fn has_echoed_organization(&self) -> bool {
        non_blank(self.echoed_institution_id.as_deref())
            && non_blank(self.echoed_external_org_id.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}
