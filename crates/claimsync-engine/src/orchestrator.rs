//! One enrichment invocation, end to end.
//!
//! Parse affiliation and resolve the organization (concurrently with the
//! catalogue read), derive roles, reconcile the catalogue record, notify on
//! creation, write the attribute delta, then decide whether to request a
//! retry. A fatal error at any step stops the sequence, so no attribute write
//! follows a failed reconciliation.
//!
//! An undelivered new-user notice is handed back inside
//! [`EnrichError::Notification`]. A re-invocation finds the created record and
//! does not notify again, so the caller replays the notice through
//! [`ReconciliationOrchestrator::deliver_notice`].

use std::sync::Arc;

use claimsync_core::{
    AttributeWriter, CustomerDirectory, IdentityClaims, OrganizationMatch, UserCatalogue,
    UserCreatedNotice, UserCreatedNotifier,
};
use tracing::{debug, info, instrument, warn};

use crate::affiliation::AffiliationParser;
use crate::attributes::{AttributeSynchronizer, ProviderUserKey};
use crate::error::EnrichError;
use crate::event::{TriggerEvent, Variant};
use crate::organization::OrganizationResolver;
use crate::output::{EnrichmentOutcome, EnrichmentOutput, TokenResponse};
use crate::policy::RolePolicy;
use crate::reconciler::UserReconciler;
use crate::settings::EngineSettings;

/// External systems one orchestrator talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn CustomerDirectory>,
    pub catalogue: Arc<dyn UserCatalogue>,
    pub writer: Arc<dyn AttributeWriter>,
    pub notifier: Arc<dyn UserCreatedNotifier>,
}

pub struct ReconciliationOrchestrator {
    parser: AffiliationParser,
    resolver: OrganizationResolver,
    policy: RolePolicy,
    reconciler: UserReconciler,
    synchronizer: AttributeSynchronizer,
    notifier: Arc<dyn UserCreatedNotifier>,
    default_user_pool_id: String,
}

impl ReconciliationOrchestrator {
    #[must_use]
    pub fn new(settings: &EngineSettings, collaborators: Collaborators) -> Self {
        Self {
            parser: AffiliationParser::new(settings.hosting_domain_suffix.clone()),
            resolver: OrganizationResolver::new(
                collaborators.directory,
                settings.country_prefix_len,
                settings.lookup_timeout,
            ),
            policy: RolePolicy::new(settings.creator_rule),
            reconciler: UserReconciler::new(collaborators.catalogue, settings.catalogue_timeout),
            synchronizer: AttributeSynchronizer::new(
                collaborators.writer,
                settings.identifier_prefix.clone(),
                settings.application_tag.clone(),
                settings.provider_timeout,
            ),
            notifier: collaborators.notifier,
            default_user_pool_id: settings.default_user_pool_id.clone(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &RolePolicy {
        &self.policy
    }

    /// Enrich one inbound event.
    ///
    /// # Errors
    ///
    /// Same as [`Self::enrich_claims`].
    pub async fn enrich(&self, event: &TriggerEvent) -> Result<EnrichmentOutcome, EnrichError> {
        let key = event.provider_user_key(&self.default_user_pool_id);
        if key.username.is_empty() || key.user_pool_id.is_empty() {
            return Err(EnrichError::InvalidEvent(
                "event names no provider user or user pool".into(),
            ));
        }
        self.enrich_claims(&event.claims(), &key, event.variant())
            .await
    }

    /// Run the full reconciliation for `claims` and write the result to `key`.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::InvalidEvent` for claims without a federated id,
    /// and propagates catalogue, notification, provider, and timeout failures.
    /// Organization lookup problems are never errors.
    #[instrument(skip_all, fields(username = %claims.federated_id, ?variant))]
    pub async fn enrich_claims(
        &self,
        claims: &IdentityClaims,
        key: &ProviderUserKey,
        variant: Variant,
    ) -> Result<EnrichmentOutcome, EnrichError> {
        claims.validate()?;

        let effective = self.parser.effective(claims);
        let (org, existing) = tokio::join!(
            self.organization(claims, effective.org_number.as_deref()),
            self.reconciler.lookup(&claims.federated_id),
        );
        let existing = existing?;

        let roles = self
            .policy
            .derive_roles(&effective.tokens, org.has_institution());
        debug!(
            hosted = effective.hosted,
            institution_id = ?org.institution_id,
            roles = %roles,
            "roles derived"
        );

        let reconciliation = self.reconciler.apply(existing, claims, &org, &roles).await?;
        if reconciliation.outcome.created() {
            self.deliver_notice(UserCreatedNotice::for_record(&reconciliation.record))
                .await?;
        }

        let delta = self
            .synchronizer
            .compute_delta(&reconciliation.record, claims);
        let token_response = match variant {
            Variant::TokenIssuance => TokenResponse::for_record(&reconciliation.record),
            Variant::PassThrough => None,
        };
        self.synchronizer.write(key, &delta).await?;

        let retry = token_response.is_none()
            && AttributeSynchronizer::requires_retry_signal(claims, &delta);
        info!(
            reconcile = %reconciliation.outcome,
            attributes = delta.len(),
            retry,
            "enrichment committed"
        );

        let output = EnrichmentOutput {
            user: reconciliation.record,
            reconcile: reconciliation.outcome,
            delta,
            token_response,
        };
        Ok(if retry {
            EnrichmentOutcome::RetryRequested(output)
        } else {
            EnrichmentOutcome::Committed(output)
        })
    }

    /// Deliver a new-user notice.
    ///
    /// Also the replay path for the notice carried by a failed invocation.
    ///
    /// # Errors
    ///
    /// Returns `EnrichError::Notification` carrying `notice` when delivery
    /// fails after the notifier's last attempt.
    pub async fn deliver_notice(&self, notice: UserCreatedNotice) -> Result<(), EnrichError> {
        match self.notifier.notify_user_created(&notice).await {
            Ok(()) => Ok(()),
            Err(source) => {
                warn!(
                    username = %notice.federated_id,
                    error = %source,
                    "new-user notice undelivered, handing it back to the caller"
                );
                Err(EnrichError::Notification {
                    notice: Box::new(notice),
                    source,
                })
            }
        }
    }

    /// Echoed organization ids short-circuit the lookup.
    async fn organization(
        &self,
        claims: &IdentityClaims,
        org_number: Option<&str>,
    ) -> OrganizationMatch {
        if claims.has_echoed_organization() {
            debug!("organization echoed by provider, skipping lookup");
            return OrganizationMatch::new(
                claims.echoed_institution_id.clone(),
                claims.echoed_external_org_id.clone(),
            );
        }
        self.resolver.resolve_raw(org_number).await
    }
}
