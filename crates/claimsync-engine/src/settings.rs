//! Engine settings derived from configuration.

use std::time::Duration;

use claimsync_config::{ClaimSyncConfig, CreatorRule};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    pub creator_rule: CreatorRule,
    pub identifier_prefix: String,
    pub application_tag: String,
    pub hosting_domain_suffix: String,
    pub country_prefix_len: usize,
    /// Used when an event names no user pool.
    pub default_user_pool_id: String,
    pub lookup_timeout: Duration,
    pub catalogue_timeout: Duration,
    pub provider_timeout: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&ClaimSyncConfig::default())
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_config(config: &ClaimSyncConfig) -> Self {
        Self {
            creator_rule: config.policy.creator_rule,
            identifier_prefix: config.federation.identifier_prefix.clone(),
            application_tag: config.federation.application_tag.clone(),
            hosting_domain_suffix: config.federation.hosting_domain_suffix.clone(),
            country_prefix_len: config.federation.country_prefix_len,
            default_user_pool_id: config.provider.user_pool_id.clone(),
            lookup_timeout: config.customer_api.timeout(),
            catalogue_timeout: config.user_api.timeout(),
            provider_timeout: config.provider.timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_config_defaults() {
        let settings = EngineSettings::default();
        assert_eq!(settings.identifier_prefix, "feide:");
        assert_eq!(settings.country_prefix_len, 2);
        assert_eq!(settings.lookup_timeout, Duration::from_millis(3_000));
        assert_eq!(settings.catalogue_timeout, Duration::from_millis(5_000));
    }
}
