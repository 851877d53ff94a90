//! Shared HTTP response helpers for service clients.
//!
//! Centralizes status-code checks (409 conflict, 429 rate limiting with
//! `Retry-After` parsing, non-success → [`ClientError::Api`]) so individual
//! client modules stay focused on request construction and response mapping.

use std::time::Duration;

use crate::error::ClientError;

/// Build a `reqwest::Client` with the given per-request timeout.
///
/// # Panics
///
/// Panics if the underlying `reqwest::Client` fails to build (TLS backend
/// initialization failure).
pub fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("claimsync/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .expect("reqwest client should build")
}

/// Check an HTTP response for common error conditions.
///
/// Returns the response unchanged on success. Handles:
/// - **409 Conflict** → [`ClientError::Conflict`] carrying `conflict_key`.
/// - **429 Too Many Requests** → [`ClientError::RateLimited`] with
///   `Retry-After` header parsing (falls back to 1 s if absent or
///   unparseable).
/// - **Non-success status** → [`ClientError::Api`] with status code and
///   response body.
pub async fn check_response(
    resp: reqwest::Response,
    conflict_key: &str,
) -> Result<reqwest::Response, ClientError> {
    if resp.status() == 409 {
        return Err(ClientError::Conflict(conflict_key.to_string()));
    }
    if resp.status() == 429 {
        let retry_after = parse_retry_after(&resp);
        return Err(ClientError::RateLimited {
            retry_after_secs: retry_after,
        });
    }
    if !resp.status().is_success() {
        return Err(ClientError::Api {
            status: resp.status().as_u16(),
            message: resp.text().await.unwrap_or_default(),
        });
    }
    Ok(resp)
}

/// Read a JSON body, treating an empty body as `None`.
pub async fn read_optional_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<Option<T>, ClientError> {
    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| ClientError::Parse(e.to_string()))
}

/// Parse the `Retry-After` header as seconds, falling back to 1 s.
fn parse_retry_after(resp: &reqwest::Response) -> u64 {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1)
}
