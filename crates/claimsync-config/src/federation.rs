//! Federation-specific constants used when reading claims and writing attributes.

use serde::{Deserialize, Serialize};

fn default_identifier_prefix() -> String {
    "feide:".into()
}

fn default_application_tag() -> String {
    "NVA".into()
}

fn default_hosting_domain_suffix() -> String {
    "@bibsys.no".into()
}

const fn default_country_prefix_len() -> usize {
    2
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FederationConfig {
    /// Prefix of the synthesized `custom:identifiers` value.
    #[serde(default = "default_identifier_prefix")]
    pub identifier_prefix: String,

    /// Value written to `custom:application`.
    #[serde(default = "default_application_tag")]
    pub application_tag: String,

    /// Username suffix of identities hosted on behalf of another organization.
    #[serde(default = "default_hosting_domain_suffix")]
    pub hosting_domain_suffix: String,

    /// Width of the alphabetic country code that may prefix an org number.
    #[serde(default = "default_country_prefix_len")]
    pub country_prefix_len: usize,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            identifier_prefix: default_identifier_prefix(),
            application_tag: default_application_tag(),
            hosting_domain_suffix: default_hosting_domain_suffix(),
            country_prefix_len: default_country_prefix_len(),
        }
    }
}
