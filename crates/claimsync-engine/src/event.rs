//! Inbound trigger event model.
//!
//! The identity provider delivers one JSON document per authentication or
//! token-issuance event. Only the fields the reconciliation reads are typed;
//! everything else is carried through untouched so the rendered output is
//! the inbound document plus a response.

use std::collections::BTreeMap;

use claimsync_core::IdentityClaims;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::attributes::ProviderUserKey;

/// Trigger sources with this prefix ask for token claims.
pub const TOKEN_GENERATION_PREFIX: &str = "TokenGeneration_";

/// How the enrichment result is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Post-authentication: the event passes through, attributes are the only effect.
    PassThrough,
    /// Pre-token-generation: resolved ids may also be embedded as claim overrides.
    TokenIssuance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerEvent {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub trigger_source: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_pool_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user_name: String,
    #[serde(default)]
    pub request: TriggerRequest,
    /// Fields not read by claimsync.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TriggerRequest {
    #[serde(default)]
    pub user_attributes: UserAttributes,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Provider-side user attributes as delivered with the event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UserAttributes {
    #[serde(rename = "custom:feideId", default, skip_serializing_if = "Option::is_none")]
    pub feide_id: Option<String>,
    #[serde(rename = "custom:orgNumber", default, skip_serializing_if = "Option::is_none")]
    pub org_number: Option<String>,
    #[serde(rename = "custom:affiliation", default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(rename = "custom:hostedOrgNumber", default, skip_serializing_if = "Option::is_none")]
    pub hosted_org_number: Option<String>,
    #[serde(rename = "custom:hostedAffiliation", default, skip_serializing_if = "Option::is_none")]
    pub hosted_affiliation: Option<String>,
    #[serde(rename = "custom:customerId", default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(rename = "custom:cristinId", default, skip_serializing_if = "Option::is_none")]
    pub cristin_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TriggerEvent {
    /// Parse an event document.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if `json` is not an event object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn variant(&self) -> Variant {
        if self.trigger_source.starts_with(TOKEN_GENERATION_PREFIX) {
            Variant::TokenIssuance
        } else {
            Variant::PassThrough
        }
    }

    /// The federation claims carried by this event.
    #[must_use]
    pub fn claims(&self) -> IdentityClaims {
        let attrs = &self.request.user_attributes;
        IdentityClaims {
            federated_id: attrs.feide_id.clone().unwrap_or_default(),
            given_name: attrs.given_name.clone().unwrap_or_default(),
            family_name: attrs.family_name.clone().unwrap_or_default(),
            raw_org_number: attrs.org_number.clone(),
            raw_affiliation: attrs.affiliation.clone(),
            hosted_org_number: attrs.hosted_org_number.clone(),
            hosted_affiliation: attrs.hosted_affiliation.clone(),
            echoed_institution_id: attrs.customer_id.clone(),
            echoed_external_org_id: attrs.cristin_id.clone(),
        }
    }

    /// Provider address of the user, falling back to `default_user_pool_id`
    /// when the event names no pool.
    #[must_use]
    pub fn provider_user_key(&self, default_user_pool_id: &str) -> ProviderUserKey {
        let pool = if self.user_pool_id.is_empty() {
            default_user_pool_id
        } else {
            &self.user_pool_id
        };
        ProviderUserKey::new(pool, &self.user_name)
    }
}

/// JSON schema of the inbound event document.
#[must_use]
pub fn event_schema() -> schemars::Schema {
    schemars::schema_for!(TriggerEvent)
}
