//! Cross-cutting and collaborator error types for claimsync.
//!
//! Each external collaborator gets its own error enum so that callers can
//! tell a catalogue conflict apart from a transport failure without string
//! matching. HTTP-specific detail is flattened to strings here; the concrete
//! clients in `claimsync-clients` do the mapping. A unified invocation error
//! lives in `claimsync-engine` where all collaborator errors converge.

use thiserror::Error;

/// Errors that can be raised by any claimsync crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors returned by an organization directory lookup.
///
/// The resolver absorbs every variant into an empty match; they exist so the
/// failure can be logged with its cause.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors returned by the user catalogue.
///
/// `Conflict` is the only variant the reconciler recovers from; everything
/// else is fatal for the current invocation.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// A record with the same key already exists (concurrent create landed first).
    #[error("user catalogue conflict for {username}")]
    Conflict { username: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl CatalogueError {
    /// Whether this error is the distinguished conflict signal.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Errors returned by the identity-provider attribute writer.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider refused the write (unknown user, unknown attribute, ...).
    #[error("attribute write rejected: {0}")]
    Rejected(String),
}

/// Errors returned when delivering a new-user notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Every attempt failed; `last` is the final attempt's error.
    #[error("notification not delivered after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

impl NotifyError {
    /// Whether another attempt may succeed.
    ///
    /// Client-side rejections (4xx other than 429) are permanent.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Api { status, .. } => *status == 429 || *status >= 500,
            Self::Exhausted { .. } => false,
        }
    }
}
