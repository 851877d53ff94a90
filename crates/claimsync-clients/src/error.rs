//! Client error types and their mapping onto the collaborator errors.

use claimsync_core::{CatalogueError, DirectoryError, NotifyError, ProviderError};
use thiserror::Error;

/// Errors that can occur when talking to a remote service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the service.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service reported that the resource already exists (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Failed to parse a service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// The service returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl ClientError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            Self::Api { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::Conflict(_) | Self::Parse(_) => false,
        }
    }

    /// Flatten into `(status, message)` for the non-transport variants.
    fn into_api_parts(self) -> (u16, String) {
        match self {
            Self::Api { status, message } => (status, message),
            Self::Conflict(message) => (409, message),
            other @ Self::RateLimited { .. } => (429, other.to_string()),
            other => (0, other.to_string()),
        }
    }
}

impl From<ClientError> for DirectoryError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::Transport(e.to_string()),
            ClientError::Parse(msg) => Self::Parse(msg),
            other => {
                let (status, message) = other.into_api_parts();
                Self::Api { status, message }
            }
        }
    }
}

impl From<ClientError> for CatalogueError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::Transport(e.to_string()),
            ClientError::Parse(msg) => Self::Parse(msg),
            ClientError::Conflict(username) => Self::Conflict { username },
            other => {
                let (status, message) = other.into_api_parts();
                Self::Api { status, message }
            }
        }
    }
}

impl From<ClientError> for ProviderError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::Transport(e.to_string()),
            ClientError::Api { status, message } if (400..500).contains(&status) => {
                Self::Rejected(message)
            }
            other => {
                let (status, message) = other.into_api_parts();
                Self::Api { status, message }
            }
        }
    }
}

impl From<ClientError> for NotifyError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => Self::Transport(e.to_string()),
            other => {
                let (status, message) = other.into_api_parts();
                Self::Api { status, message }
            }
        }
    }
}
