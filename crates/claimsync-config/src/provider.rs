//! Identity-provider attribute write configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Admin endpoint accepting update-user-attributes requests.
    #[serde(default)]
    pub endpoint: String,

    /// Fallback user pool id when the event does not carry one.
    #[serde(default)]
    pub user_pool_id: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            user_pool_id: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ProviderConfig {
    pub fn is_configured(&self) -> bool {
        !self.endpoint.is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
