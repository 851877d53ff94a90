//! # claimsync-config
//!
//! Layered configuration loading for claimsync using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`CLAIMSYNC_*` prefix, `__` as separator)
//! 2. External overrides (e.g. values fetched from a secret backend)
//! 3. Working-directory `claimsync.toml`
//! 4. User-level `~/.config/claimsync/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `CLAIMSYNC_USER_API__SECRET` -> `user_api.secret`,
//! `CLAIMSYNC_POLICY__CREATOR_RULE` -> `policy.creator_rule`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use claimsync_config::ClaimSyncConfig;
//!
//! let config = ClaimSyncConfig::load_with_dotenv().expect("config");
//! if config.user_api.is_configured() {
//!     println!("user catalogue: {}", config.user_api.base_url);
//! }
//! ```

mod customer_api;
mod error;
mod federation;
mod notifier;
mod policy;
mod provider;
mod user_api;

pub use customer_api::CustomerApiConfig;
pub use error::ConfigError;
pub use federation::FederationConfig;
pub use notifier::NotifierConfig;
pub use policy::{CreatorRule, PolicyConfig};
pub use provider::ProviderConfig;
pub use user_api::UserApiConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const ENV_PREFIX: &str = "CLAIMSYNC_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ClaimSyncConfig {
    #[serde(default)]
    pub customer_api: CustomerApiConfig,
    #[serde(default)]
    pub user_api: UserApiConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
    #[serde(default)]
    pub federation: FederationConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl ClaimSyncConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source cannot be parsed or a value
    /// has the wrong type.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Load configuration with externally supplied `CLAIMSYNC_*` pairs.
    ///
    /// Overrides sit above the TOML files but below the process environment,
    /// so an explicitly exported variable always wins.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_env_overrides(overrides: &[(String, String)]) -> Result<Self, ConfigError> {
        let mut figment = Self::file_figment();
        for (key, value) in overrides {
            if let Some(path) = env_key_to_path(key) {
                figment = figment.merge(Serialized::default(&path, value));
            }
        }
        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(ConfigError::from)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        Self::file_figment().merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Defaults plus TOML layers, without the environment.
    fn file_figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from("claimsync.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("claimsync").join("config.toml"))
    }

    /// Check that every section needed for a live enrichment is usable.
    ///
    /// The notifier is optional; when enabled it must allow at least one attempt.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` for the first missing section and
    /// `ConfigError::InvalidValue` for out-of-range values.
    pub fn ensure_ready(&self) -> Result<(), ConfigError> {
        let sections = [
            ("customer_api", self.customer_api.is_configured()),
            ("user_api", self.user_api.is_configured()),
            ("provider", self.provider.is_configured()),
        ];
        if let Some((section, _)) = sections.iter().find(|(_, ok)| !ok) {
            return Err(ConfigError::NotConfigured {
                section: (*section).to_string(),
            });
        }

        if self.notifier.is_enabled() && self.notifier.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "notifier.max_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }

        let timeouts = [
            ("customer_api.timeout_ms", self.customer_api.timeout_ms),
            ("user_api.timeout_ms", self.user_api.timeout_ms),
            ("provider.timeout_ms", self.provider.timeout_ms),
        ];
        if let Some((field, _)) = timeouts.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::InvalidValue {
                field: (*field).to_string(),
                reason: "timeout must be greater than zero".into(),
            });
        }

        Ok(())
    }
}

/// `CLAIMSYNC_USER_API__SECRET` -> `user_api.secret`.
fn env_key_to_path(key: &str) -> Option<String> {
    let rest = key.strip_prefix(ENV_PREFIX)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.to_ascii_lowercase().replace("__", "."))
}
