//! New-user notification delivery.
//!
//! Delivery is synchronous: [`HttpUserCreatedNotifier`] returns only after the
//! receiver acknowledged the message, retrying transient failures with
//! bounded exponential backoff. [`NoopNotifier`] stands in when no endpoint is
//! configured.

use std::time::Duration;

use async_trait::async_trait;
use claimsync_core::{NotifyError, Role, UserCreatedNotice, UserCreatedNotifier};
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::ClientError;
use crate::http::{build_client, check_response};

const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Bounded exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay after the first failed attempt.
    pub initial_backoff: Duration,
    /// Upper bound for any single delay.
    pub max_backoff: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub const fn new(max_attempts: u32, initial_backoff: Duration) -> Self {
        Self {
            max_attempts,
            initial_backoff,
            max_backoff: MAX_BACKOFF,
        }
    }

    /// Delay after the failed attempt with 0-based index `attempt`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserCreatedMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    username: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    institution: Option<&'a str>,
    roles: Vec<&'a str>,
    created_at: String,
}

impl<'a> From<&'a UserCreatedNotice> for UserCreatedMessage<'a> {
    fn from(notice: &'a UserCreatedNotice) -> Self {
        Self {
            kind: "UserCreated",
            username: &notice.federated_id,
            institution: notice.institution_id.as_deref(),
            roles: notice.roles.iter().map(Role::as_str).collect(),
            created_at: notice.created_at.to_rfc3339(),
        }
    }
}

/// Posts user-created messages to an HTTP endpoint.
pub struct HttpUserCreatedNotifier {
    http: reqwest::Client,
    endpoint: String,
    retry: RetryPolicy,
}

impl HttpUserCreatedNotifier {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration, retry: RetryPolicy) -> Self {
        Self {
            http: build_client(timeout),
            endpoint: endpoint.into(),
            retry,
        }
    }

    async fn post(&self, message: &UserCreatedMessage<'_>) -> Result<(), ClientError> {
        let resp = self.http.post(&self.endpoint).json(message).send().await?;
        check_response(resp, message.username).await?;
        Ok(())
    }
}

#[async_trait]
impl UserCreatedNotifier for HttpUserCreatedNotifier {
    #[instrument(skip_all, fields(username = %notice.federated_id))]
    async fn notify_user_created(&self, notice: &UserCreatedNotice) -> Result<(), NotifyError> {
        let message = UserCreatedMessage::from(notice);
        let max_attempts = self.retry.attempts();

        for attempt in 0..max_attempts {
            let err = match self.post(&message).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };

            if !err.is_transient() {
                return Err(err.into());
            }
            if attempt + 1 == max_attempts {
                warn!(attempts = max_attempts, error = %err, "user-created notification not delivered");
                return Err(NotifyError::Exhausted {
                    attempts: max_attempts,
                    last: err.to_string(),
                });
            }

            let mut delay = self.retry.delay_for(attempt);
            if let ClientError::RateLimited { retry_after_secs } = &err {
                let requested = Duration::from_secs(*retry_after_secs).min(self.retry.max_backoff);
                delay = delay.max(requested);
            }
            debug!(
                attempt = attempt + 1,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "retrying notification after transient error"
            );
            tokio::time::sleep(delay).await;
        }

        Err(NotifyError::Exhausted {
            attempts: max_attempts,
            last: "no attempt made".into(),
        })
    }
}

/// Notifier that accepts every notice without sending anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl UserCreatedNotifier for NoopNotifier {
    async fn notify_user_created(&self, notice: &UserCreatedNotice) -> Result<(), NotifyError> {
        debug!(username = %notice.federated_id, "notification disabled, skipping");
        Ok(())
    }
}
