use std::sync::Arc;

use anyhow::Context;
use claimsync_clients::{
    CustomerApiClient, HttpAttributeWriter, HttpUserCreatedNotifier, NoopNotifier, RetryPolicy,
    UserApiClient,
};
use claimsync_config::ClaimSyncConfig;
use claimsync_core::UserCreatedNotifier;
use claimsync_engine::{Collaborators, EngineSettings, ReconciliationOrchestrator};

/// Load layered configuration, reading `./.env` first when present.
pub fn load_config() -> anyhow::Result<ClaimSyncConfig> {
    ClaimSyncConfig::load_with_dotenv().context("failed to load claimsync configuration")
}

/// Wire HTTP collaborators from `config` into an orchestrator.
pub fn build_orchestrator(config: &ClaimSyncConfig) -> anyhow::Result<ReconciliationOrchestrator> {
    config
        .ensure_ready()
        .context("claimsync is not ready to enrich events")?;

    let settings = EngineSettings::from_config(config);
    let collaborators = Collaborators {
        directory: Arc::new(CustomerApiClient::new(
            &config.customer_api.base_url,
            config.customer_api.timeout(),
        )),
        catalogue: Arc::new(UserApiClient::new(
            &config.user_api.base_url,
            &config.user_api.secret,
            config.user_api.timeout(),
        )),
        writer: Arc::new(HttpAttributeWriter::new(
            &config.provider.endpoint,
            config.provider.timeout(),
        )),
        notifier: notifier(config),
    };

    Ok(ReconciliationOrchestrator::new(&settings, collaborators))
}

fn notifier(config: &ClaimSyncConfig) -> Arc<dyn UserCreatedNotifier> {
    if !config.notifier.is_enabled() {
        tracing::debug!("user-created notification disabled");
        return Arc::new(NoopNotifier);
    }
    Arc::new(HttpUserCreatedNotifier::new(
        &config.notifier.endpoint,
        config.notifier.timeout(),
        RetryPolicy::new(
            config.notifier.max_attempts,
            config.notifier.initial_backoff(),
        ),
    ))
}
