//! Affiliation claim parsing and the hosted-identity override.
//!
//! Affiliations arrive as a bracketed, comma-delimited list such as
//! `[member, employee, staff]`. Parsing never fails: anything unusable
//! contributes no tokens.

use std::collections::BTreeSet;

use claimsync_core::IdentityClaims;

/// Normalized, lower-cased affiliation tokens.
pub type AffiliationTokens = BTreeSet<String>;

/// Parse a raw affiliation list into lower-cased tokens.
#[must_use]
pub fn parse_affiliation(raw: Option<&str>) -> AffiliationTokens {
    entries(raw).map(str::to_lowercase).collect()
}

/// Parse a hosted affiliation list, whose entries look like `staff@host.no`.
///
/// The `@domain` suffix is stripped; entries without one are dropped.
#[must_use]
pub fn parse_hosted_affiliation(raw: Option<&str>) -> AffiliationTokens {
    entries(raw)
        .filter_map(|entry| entry.split_once('@'))
        .map(|(token, _domain)| token.trim())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn entries(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split(',')
        .map(|entry| entry.trim().trim_matches(|c| c == '[' || c == ']').trim())
        .filter(|entry| !entry.is_empty())
}

/// Organization number and affiliation tokens after the hosted override.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveAffiliation {
    pub org_number: Option<String>,
    pub tokens: AffiliationTokens,
    /// Whether the hosted fields replaced the federation's own.
    pub hosted: bool,
}

/// Applies the hosting-domain override and tokenizes affiliations.
#[derive(Debug, Clone)]
pub struct AffiliationParser {
    hosting_domain_suffix: String,
}

impl AffiliationParser {
    #[must_use]
    pub fn new(hosting_domain_suffix: impl Into<String>) -> Self {
        Self {
            hosting_domain_suffix: hosting_domain_suffix.into(),
        }
    }

    /// Whether `claims` describe an identity hosted on behalf of another organization.
    #[must_use]
    pub fn is_hosted(&self, claims: &IdentityClaims) -> bool {
        !self.hosting_domain_suffix.is_empty()
            && claims.federated_id.ends_with(&self.hosting_domain_suffix)
            && claims
                .hosted_org_number
                .as_deref()
                .is_some_and(|org| !org.trim().is_empty())
    }

    /// Select the organization number and parse the affiliation that govern `claims`.
    #[must_use]
    pub fn effective(&self, claims: &IdentityClaims) -> EffectiveAffiliation {
        if self.is_hosted(claims) {
            return EffectiveAffiliation {
                org_number: claims.hosted_org_number.clone(),
                tokens: parse_hosted_affiliation(claims.hosted_affiliation.as_deref()),
                hosted: true,
            };
        }
        EffectiveAffiliation {
            org_number: claims.raw_org_number.clone(),
            tokens: parse_affiliation(claims.raw_affiliation.as_deref()),
            hosted: false,
        }
    }
}
