//! Application roles and the ordered role set stored on a user record.
//!
//! Role order is significant: the set serializes to the CSV written to the
//! provider's `custom:applicationRoles` attribute, elevated roles first and
//! the base `User` role last.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// A named application role.
///
/// Only [`Role::CREATOR`] and [`Role::USER`] are derived by claimsync; any
/// other name may be present on a catalogue record and is carried through
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Base role every user holds.
    pub const USER: &'static str = "User";
    /// Elevated role granted by affiliation policy.
    pub const CREATOR: &'static str = "Creator";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn user() -> Self {
        Self::new(Self::USER)
    }

    #[must_use]
    pub fn creator() -> Self {
        Self::new(Self::CREATOR)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether claimsync derives this role (and therefore may revoke it).
    #[must_use]
    pub fn is_managed(&self) -> bool {
        self.0 == Self::USER || self.0 == Self::CREATOR
    }

    #[must_use]
    pub fn is_base(&self) -> bool {
        self.0 == Self::USER
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// RoleSet
// ---------------------------------------------------------------------------

/// Insertion-ordered set of roles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<Role>);

impl RoleSet {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// The base-only set `{User}`.
    #[must_use]
    pub fn base() -> Self {
        let mut set = Self::new();
        set.insert(Role::user());
        set
    }

    /// Append `role` unless already present. Returns whether it was added.
    pub fn insert(&mut self, role: Role) -> bool {
        if self.0.contains(&role) {
            return false;
        }
        self.0.push(role);
        true
    }

    #[must_use]
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r.as_str() == role)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Role> {
        self.0.iter()
    }

    /// Comma-joined role names in insertion order (e.g. `Creator,User`).
    #[must_use]
    pub fn to_csv(&self) -> String {
        self.0
            .iter()
            .map(Role::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Recompute the managed roles of an existing set.
    ///
    /// Elevated roles from `derived` come first, followed by every unmanaged
    /// role of `self` in its original order, followed by `User`. Managed roles
    /// held in `self` but absent from `derived` are dropped.
    #[must_use]
    pub fn merged_with(&self, derived: &Self) -> Self {
        let mut merged = Self::new();
        for role in derived.iter().filter(|r| !r.is_base()) {
            merged.insert(role.clone());
        }
        for role in self.iter().filter(|r| !r.is_managed()) {
            merged.insert(role.clone());
        }
        merged.insert(Role::user());
        merged
    }
}

impl RoleSet {
    /// The same roles in canonical order: elevated managed roles, then
    /// unmanaged roles, then `User`. `User` is added when missing.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut normalized = Self::new();
        for role in self.iter().filter(|r| r.is_managed() && !r.is_base()) {
            normalized.insert(role.clone());
        }
        for role in self.iter().filter(|r| !r.is_managed()) {
            normalized.insert(role.clone());
        }
        normalized.insert(Role::user());
        normalized
    }

    /// Whether both sets hold the same roles, in any order.
    #[must_use]
    pub fn same_members(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|role| other.0.contains(role))
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = Self::new();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_csv())
    }
}
