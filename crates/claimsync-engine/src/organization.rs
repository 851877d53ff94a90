//! Organization number → institution resolution.
//!
//! Lookup failures of any kind (transport, status, parse, timeout) are
//! absorbed into [`OrganizationMatch::unknown`]: an unresolved organization is
//! a normal outcome that only limits the roles a user can be granted.

use std::sync::Arc;
use std::time::Duration;

use claimsync_core::{CustomerDirectory, OrganizationMatch};
use tracing::{debug, warn};

/// Strip a leading alphabetic country code of `prefix_len` characters.
///
/// Returns `None` for blank input. Numbers without an alphabetic prefix are
/// returned trimmed but otherwise unchanged, so `NO1234567890` and
/// `1234567890` clean to the same value.
#[must_use]
pub fn clean_org_number(raw: &str, prefix_len: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let has_prefix = prefix_len > 0
        && trimmed.len() > prefix_len
        && trimmed
            .bytes()
            .take(prefix_len)
            .all(|b| b.is_ascii_alphabetic());
    if has_prefix {
        Some(trimmed[prefix_len..].to_string())
    } else {
        Some(trimmed.to_string())
    }
}

pub struct OrganizationResolver {
    directory: Arc<dyn CustomerDirectory>,
    country_prefix_len: usize,
    timeout: Duration,
}

impl OrganizationResolver {
    #[must_use]
    pub fn new(
        directory: Arc<dyn CustomerDirectory>,
        country_prefix_len: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            directory,
            country_prefix_len,
            timeout,
        }
    }

    /// Clean `raw_org_number` and resolve it. Absent or blank input resolves
    /// to an unknown organization without calling the directory.
    pub async fn resolve_raw(&self, raw_org_number: Option<&str>) -> OrganizationMatch {
        match raw_org_number.and_then(|raw| clean_org_number(raw, self.country_prefix_len)) {
            Some(cleaned) => self.resolve(&cleaned).await,
            None => {
                debug!("no organization number in claims");
                OrganizationMatch::unknown()
            }
        }
    }

    /// Resolve an already-cleaned organization number with a single lookup.
    pub async fn resolve(&self, cleaned_org_number: &str) -> OrganizationMatch {
        let lookup = self.directory.find_by_org_number(cleaned_org_number);
        match tokio::time::timeout(self.timeout, lookup).await {
            Ok(Ok(Some(found))) => {
                debug!(
                    org_number = cleaned_org_number,
                    institution_id = ?found.institution_id,
                    "organization resolved"
                );
                found
            }
            Ok(Ok(None)) => {
                warn!(org_number = cleaned_org_number, "organization not found");
                OrganizationMatch::unknown()
            }
            Ok(Err(e)) => {
                warn!(org_number = cleaned_org_number, error = %e, "organization lookup failed");
                OrganizationMatch::unknown()
            }
            Err(_) => {
                warn!(
                    org_number = cleaned_org_number,
                    timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                    "organization lookup timed out"
                );
                OrganizationMatch::unknown()
            }
        }
    }
}
