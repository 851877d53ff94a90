//! New-user notification delivery configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

const fn default_max_attempts() -> u32 {
    3
}

const fn default_initial_backoff_ms() -> u64 {
    200
}

const fn default_timeout_ms() -> u64 {
    3_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NotifierConfig {
    /// Endpoint receiving user-created messages. Empty disables notification.
    #[serde(default)]
    pub endpoint: String,

    /// Total delivery attempts, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles on every further attempt.
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl NotifierConfig {
    pub fn is_enabled(&self) -> bool {
        !self.endpoint.is_empty()
    }

    pub const fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
