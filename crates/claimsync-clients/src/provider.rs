//! Identity-provider attribute writer.
//!
//! Issues the admin update-user-attributes call; every named attribute is
//! replaced in full by the provider.

use std::time::Duration;

use async_trait::async_trait;
use claimsync_core::{AttributeDelta, AttributeWriter, ProviderError};
use serde::Serialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::{build_client, check_response};

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UpdateUserAttributesRequest<'a> {
    user_pool_id: &'a str,
    username: &'a str,
    user_attributes: Vec<AttributeType<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AttributeType<'a> {
    name: &'a str,
    value: &'a str,
}

impl<'a> UpdateUserAttributesRequest<'a> {
    fn new(user_pool_id: &'a str, username: &'a str, delta: &'a AttributeDelta) -> Self {
        Self {
            user_pool_id,
            username,
            user_attributes: delta
                .iter()
                .map(|a| AttributeType {
                    name: &a.name,
                    value: &a.value,
                })
                .collect(),
        }
    }
}

/// Writes attribute deltas to the provider's admin endpoint.
pub struct HttpAttributeWriter {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAttributeWriter {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            endpoint: endpoint.into(),
        }
    }

    async fn send(
        &self,
        request: &UpdateUserAttributesRequest<'_>,
    ) -> Result<(), ClientError> {
        let resp = self.http.post(&self.endpoint).json(request).send().await?;
        check_response(resp, request.username).await?;
        Ok(())
    }
}

#[async_trait]
impl AttributeWriter for HttpAttributeWriter {
    #[instrument(skip(self, delta), fields(attributes = delta.len()), level = "debug")]
    async fn write_attributes(
        &self,
        user_pool_id: &str,
        username: &str,
        delta: &AttributeDelta,
    ) -> Result<(), ProviderError> {
        let request = UpdateUserAttributesRequest::new(user_pool_id, username, delta);
        Ok(self.send(&request).await?)
    }
}
