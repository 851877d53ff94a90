//! Identity-provider attribute names and the delta written per invocation.

use serde::{Deserialize, Serialize};

/// Internal institution id of the user's organization.
pub const CUSTOMER_ID: &str = "custom:customerId";
/// External registry id of the user's organization.
pub const EXTERNAL_ORG_ID: &str = "custom:cristinId";
/// Fixed application tag.
pub const APPLICATION: &str = "custom:application";
/// Federation-prefixed identifier list.
pub const IDENTIFIERS: &str = "custom:identifiers";
/// CSV of application roles.
pub const APPLICATION_ROLES: &str = "custom:applicationRoles";
/// CSV of catalogue access rights.
pub const ACCESS_RIGHTS: &str = "custom:accessRights";

/// A single named attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Ordered attribute overwrite set for one provider user.
///
/// The provider replaces each named attribute in full; attributes not named
/// here are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeDelta(Vec<Attribute>);

impl AttributeDelta {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `name` to `value`, replacing an earlier value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.0.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.0.push(Attribute { name, value });
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
