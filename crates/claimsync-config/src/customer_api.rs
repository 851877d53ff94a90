//! Organization (customer) lookup API configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_timeout_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerApiConfig {
    /// Base URL of the customer service.
    #[serde(default)]
    pub base_url: String,

    /// Per-request timeout in milliseconds. A timed-out lookup counts as an
    /// unknown organization.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for CustomerApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl CustomerApiConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
