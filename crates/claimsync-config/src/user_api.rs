//! User catalogue API configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserApiConfig {
    /// Base URL of the user catalogue (e.g. `https://api.example.org`).
    #[serde(default)]
    pub base_url: String,

    /// Value sent verbatim in the `Authorization` header.
    #[serde(default)]
    pub secret: String,

    /// Per-request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for UserApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            secret: String::new(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl UserApiConfig {
    /// Check if the catalogue config has the minimum required fields.
    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.secret.is_empty()
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
