//! Invocation-boundary error type.

use claimsync_core::{CatalogueError, CoreError, NotifyError, ProviderError, UserCreatedNotice};
use thiserror::Error;

/// Hard failure of one enrichment invocation.
///
/// Absorbed conditions (unknown organization, malformed affiliation, catalogue
/// conflict) never surface here, and neither does the retry signal: that is an
/// [`EnrichmentOutcome`](crate::EnrichmentOutcome) variant.
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The inbound event or claims failed validation.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("user catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("identity provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The record was created but its notice was not delivered.
    ///
    /// A re-invocation finds the record and does not notify again, so the
    /// caller owns `notice` from here on and must replay it.
    #[error("new-user notification failed: {source}")]
    Notification {
        notice: Box<UserCreatedNotice>,
        #[source]
        source: NotifyError,
    },

    /// An external call exceeded its deadline.
    #[error("{operation} timed out")]
    Timeout { operation: &'static str },
}

impl EnrichError {
    /// Every variant aborts the invocation; none should be re-invoked blindly.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        true
    }

    /// The undelivered new-user notice, if this is a notification failure.
    #[must_use]
    pub fn pending_notice(&self) -> Option<&UserCreatedNotice> {
        match self {
            Self::Notification { notice, .. } => Some(&**notice),
            _ => None,
        }
    }
}

impl From<CoreError> for EnrichError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::InvalidEvent(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_names_operation() {
        let err = EnrichError::Timeout {
            operation: "catalogue update",
        };
        assert_eq!(err.to_string(), "catalogue update timed out");
        assert!(err.is_fatal());
    }

    #[test]
    fn notification_failure_carries_notice() {
        let notice = UserCreatedNotice::for_record(&claimsync_core::UserRecord {
            federated_id: "u1".into(),
            ..claimsync_core::UserRecord::default()
        });
        let err = EnrichError::Notification {
            notice: Box::new(notice),
            source: NotifyError::Exhausted {
                attempts: 3,
                last: "503".into(),
            },
        };
        assert_eq!(err.pending_notice().map(|n| n.federated_id.as_str()), Some("u1"));
        assert!(err.to_string().starts_with("new-user notification failed"));

        let other = EnrichError::Timeout {
            operation: "catalogue read",
        };
        assert!(other.pending_notice().is_none());
    }

    #[test]
    fn validation_becomes_invalid_event() {
        let err: EnrichError = CoreError::Validation("federated id must not be empty".into()).into();
        assert!(matches!(err, EnrichError::InvalidEvent(_)));
    }
}
