//! Customer (organization directory) client.

use std::time::Duration;

use async_trait::async_trait;
use claimsync_core::{CustomerDirectory, DirectoryError, OrganizationMatch};
use serde::Deserialize;
use tracing::instrument;

use crate::error::ClientError;
use crate::http::{build_client, check_response};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CustomerResponse {
    identifier: Option<String>,
    cristin_id: Option<String>,
}

impl From<CustomerResponse> for OrganizationMatch {
    fn from(resp: CustomerResponse) -> Self {
        Self::new(
            resp.identifier.filter(|s| !s.is_empty()),
            resp.cristin_id.filter(|s| !s.is_empty()),
        )
    }
}

/// Looks up institutions by organization number.
pub struct CustomerApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl CustomerApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(&self, org_number: &str) -> Result<Option<OrganizationMatch>, ClientError> {
        let url = format!(
            "{}/customer/orgNumber/{}",
            self.base_url,
            urlencoding::encode(org_number)
        );
        let resp = self.http.get(&url).send().await?;
        if resp.status() == 404 {
            return Ok(None);
        }
        let resp = check_response(resp, org_number).await?;
        let data: CustomerResponse = resp.json().await?;
        Ok(Some(data.into()))
    }
}

#[async_trait]
impl CustomerDirectory for CustomerApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn find_by_org_number(
        &self,
        org_number: &str,
    ) -> Result<Option<OrganizationMatch>, DirectoryError> {
        Ok(self.fetch(org_number).await?)
    }
}
