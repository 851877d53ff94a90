use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::roles::RoleSet;

/// Request-scoped copy of a user catalogue record.
///
/// The catalogue owns the record; claimsync looks it up by `federated_id`,
/// creates it when absent, and updates it when claims changed. It is never
/// deleted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub federated_id: String,
    pub given_name: String,
    pub family_name: String,
    pub institution_id: Option<String>,
    pub external_org_id: Option<String>,
    pub roles: RoleSet,
    /// Access rights attached by the catalogue to the user's roles.
    ///
    /// Read-only from claimsync's point of view: never part of change detection.
    pub access_rights: Vec<String>,
}

impl UserRecord {
    /// Whether `other` differs in any field claimsync is allowed to change.
    ///
    /// Role order is not a difference.
    #[must_use]
    pub fn differs_from(&self, other: &Self) -> bool {
        self.institution_id != other.institution_id
            || self.external_org_id != other.external_org_id
            || !self.roles.same_members(&other.roles)
    }

    /// This record with its roles in canonical order.
    #[must_use]
    pub fn with_normalized_roles(mut self) -> Self {
        self.roles = self.roles.normalized();
        self
    }
}

/// Outbound message emitted once per newly created catalogue record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreatedNotice {
    pub federated_id: String,
    pub institution_id: Option<String>,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
}

impl UserCreatedNotice {
    #[must_use]
    pub fn for_record(record: &UserRecord) -> Self {
        Self {
            federated_id: record.federated_id.clone(),
            institution_id: record.institution_id.clone(),
            roles: record.roles.clone(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    fn record() -> UserRecord {
        UserRecord {
            federated_id: "u1".into(),
            given_name: "Kari".into(),
            family_name: "Nordmann".into(),
            institution_id: Some("inst-1".into()),
            external_org_id: Some("ext-1".into()),
            roles: [Role::creator(), Role::user()].into_iter().collect(),
            access_rights: vec![],
        }
    }

    #[test]
    fn identical_records_do_not_differ() {
        assert!(!record().differs_from(&record()));
    }

    #[test]
    fn names_and_access_rights_are_ignored() {
        let mut other = record();
        other.given_name = "Ola".into();
        other.access_rights = vec!["APPROVE_DOI_REQUEST".into()];
        assert!(!record().differs_from(&other));
    }

    #[test]
    fn institution_or_roles_change_is_detected() {
        let mut other = record();
        other.institution_id = Some("inst-2".into());
        assert!(record().differs_from(&other));

        let mut other = record();
        other.roles = RoleSet::base();
        assert!(record().differs_from(&other));
    }

    #[test]
    fn role_order_is_not_a_change() {
        let mut other = record();
        other.roles = [Role::user(), Role::creator()].into_iter().collect();
        assert!(!record().differs_from(&other));
        assert_eq!(other.with_normalized_roles().roles.to_csv(), "Creator,User");
    }

    #[test]
    fn notice_copies_identity_fields() {
        let notice = UserCreatedNotice::for_record(&record());
        assert_eq!(notice.federated_id, "u1");
        assert_eq!(notice.institution_id.as_deref(), Some("inst-1"));
        assert_eq!(notice.roles.to_csv(), "Creator,User");
    }
}
