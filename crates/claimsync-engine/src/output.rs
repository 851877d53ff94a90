//! Enrichment results and their rendering onto the inbound event.

use std::collections::BTreeMap;

use claimsync_core::attributes::{CUSTOMER_ID, EXTERNAL_ORG_ID};
use claimsync_core::{AttributeDelta, UserRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::TriggerEvent;
use crate::reconciler::ReconcileOutcome;

/// Claims to embed directly into an issued token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimsOverrideDetails {
    pub claims_to_add_or_override: BTreeMap<String, String>,
}

/// Response section returned for the token-issuance variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub claims_override_details: ClaimsOverrideDetails,
}

impl TokenResponse {
    /// Override carrying both organization ids of `user`, or `None` when
    /// either is unknown.
    #[must_use]
    pub fn for_record(user: &UserRecord) -> Option<Self> {
        let institution = user.institution_id.as_deref().filter(|s| !s.is_empty())?;
        let external = user.external_org_id.as_deref().filter(|s| !s.is_empty())?;
        let claims = BTreeMap::from([
            (CUSTOMER_ID.to_string(), institution.to_string()),
            (EXTERNAL_ORG_ID.to_string(), external.to_string()),
        ]);
        Some(Self {
            claims_override_details: ClaimsOverrideDetails {
                claims_to_add_or_override: claims,
            },
        })
    }
}

/// Everything one enrichment produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentOutput {
    pub user: UserRecord,
    pub reconcile: ReconcileOutcome,
    /// Attributes written to the provider.
    pub delta: AttributeDelta,
    pub token_response: Option<TokenResponse>,
}

impl EnrichmentOutput {
    /// Render the result as a new event document.
    ///
    /// The inbound event is copied; with a token response its `response`
    /// member is replaced, otherwise the copy is returned as-is.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the event cannot be serialized.
    pub fn apply_to(&self, event: &TriggerEvent) -> Result<Value, serde_json::Error> {
        let mut rendered = serde_json::to_value(event)?;
        if let (Some(response), Value::Object(map)) = (&self.token_response, &mut rendered) {
            map.insert("response".into(), serde_json::to_value(response)?);
        }
        Ok(rendered)
    }
}

/// Result of a successful invocation.
///
/// `RetryRequested` is not a failure: side effects were committed, but the
/// provider's event lacked attributes claimsync expects it to echo, so the
/// caller should re-invoke the whole cycle once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    Committed(EnrichmentOutput),
    RetryRequested(EnrichmentOutput),
}

impl EnrichmentOutcome {
    #[must_use]
    pub const fn output(&self) -> &EnrichmentOutput {
        match self {
            Self::Committed(output) | Self::RetryRequested(output) => output,
        }
    }

    #[must_use]
    pub const fn is_retry_requested(&self) -> bool {
        matches!(self, Self::RetryRequested(_))
    }
}
