use serde::{Deserialize, Serialize};

/// Result of resolving an organization number to an internal institution.
///
/// Both fields empty is a valid "unknown organization" outcome, not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationMatch {
    /// Internal customer/institution identifier.
    pub institution_id: Option<String>,
    /// External registry identifier of the organization.
    pub external_org_id: Option<String>,
}

impl OrganizationMatch {
    /// The "unknown organization" outcome.
    #[must_use]
    pub const fn unknown() -> Self {
        Self {
            institution_id: None,
            external_org_id: None,
        }
    }

    #[must_use]
    pub const fn new(institution_id: Option<String>, external_org_id: Option<String>) -> Self {
        Self {
            institution_id,
            external_org_id,
        }
    }

    /// Whether an institution was resolved. Elevated roles require this.
    #[must_use]
    pub fn has_institution(&self) -> bool {
        self.institution_id.as_deref().is_some_and(|id| !id.is_empty())
    }
}
