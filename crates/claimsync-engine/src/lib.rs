//! # claimsync-engine
//!
//! Identity claims reconciliation for federated logins.
//!
//! For each authentication or token event the engine:
//! - normalizes the affiliation claim ([`affiliation`])
//! - resolves the organization number to an institution ([`organization`])
//! - derives the application roles from a named policy ([`policy`])
//! - gets, creates, or updates the user catalogue record ([`reconciler`])
//! - computes and writes the identity-provider attribute delta ([`attributes`])
//!
//! [`ReconciliationOrchestrator`] composes these into a single call returning
//! an [`EnrichmentOutcome`]: `Committed`, or `RetryRequested` when the caller
//! should re-invoke once the provider echoes the written attributes.

pub mod affiliation;
pub mod attributes;
pub mod error;
pub mod event;
pub mod orchestrator;
pub mod organization;
pub mod output;
pub mod policy;
pub mod reconciler;
pub mod settings;

pub use affiliation::{AffiliationParser, AffiliationTokens};
pub use attributes::{AttributeSynchronizer, ProviderUserKey};
pub use error::EnrichError;
pub use event::{TriggerEvent, Variant, event_schema};
pub use orchestrator::{Collaborators, ReconciliationOrchestrator};
pub use organization::OrganizationResolver;
pub use output::{ClaimsOverrideDetails, EnrichmentOutcome, EnrichmentOutput, TokenResponse};
pub use policy::RolePolicy;
pub use reconciler::{ReconcileOutcome, Reconciliation, UserReconciler};
pub use settings::EngineSettings;
