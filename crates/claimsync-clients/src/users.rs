//! User catalogue client.
//!
//! Records travel as the catalogue's `User` document:
//!
//! ```json
//! { "type": "User", "username": "...", "givenName": "...", "familyName": "...",
//!   "institution": "...", "cristinId": "...",
//!   "roles": [{ "type": "Role", "rolename": "Creator" }], "accessRights": [] }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use claimsync_core::{CatalogueError, Role, UserCatalogue, UserRecord};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::ClientError;
use crate::http::{build_client, check_response, read_optional_json};

const USERS_PATH: &str = "users-roles-internal/service/users";

fn user_type() -> String {
    "User".into()
}

fn role_type() -> String {
    "Role".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    #[serde(rename = "type", default = "user_type")]
    kind: String,
    username: String,
    #[serde(default)]
    given_name: Option<String>,
    #[serde(default)]
    family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    institution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cristin_id: Option<String>,
    #[serde(default)]
    roles: Vec<RoleDto>,
    #[serde(default)]
    access_rights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct RoleDto {
    #[serde(rename = "type", default = "role_type")]
    kind: String,
    rolename: String,
}

impl From<&UserRecord> for UserDto {
    fn from(user: &UserRecord) -> Self {
        Self {
            kind: user_type(),
            username: user.federated_id.clone(),
            given_name: Some(user.given_name.clone()),
            family_name: Some(user.family_name.clone()),
            institution: user.institution_id.clone(),
            cristin_id: user.external_org_id.clone(),
            roles: user
                .roles
                .iter()
                .map(|r| RoleDto {
                    kind: role_type(),
                    rolename: r.as_str().to_string(),
                })
                .collect(),
            access_rights: user.access_rights.clone(),
        }
    }
}

impl From<UserDto> for UserRecord {
    fn from(dto: UserDto) -> Self {
        Self {
            federated_id: dto.username,
            given_name: dto.given_name.unwrap_or_default(),
            family_name: dto.family_name.unwrap_or_default(),
            institution_id: dto.institution.filter(|s| !s.is_empty()),
            external_org_id: dto.cristin_id.filter(|s| !s.is_empty()),
            roles: dto.roles.into_iter().map(|r| Role::new(r.rolename)).collect(),
            access_rights: dto.access_rights,
        }
    }
}

/// Reads and writes user records in the catalogue.
///
/// Every request carries the configured secret in the `Authorization` header.
pub struct UserApiClient {
    http: reqwest::Client,
    base_url: String,
    secret: String,
}

impl UserApiClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>, secret: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: build_client(timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            secret: secret.into(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/{USERS_PATH}", self.base_url)
    }

    fn user_url(&self, username: &str) -> String {
        format!(
            "{}/{USERS_PATH}/{}",
            self.base_url,
            urlencoding::encode(username)
        )
    }

    async fn fetch(&self, username: &str) -> Result<Option<UserRecord>, ClientError> {
        let resp = self
            .http
            .get(self.user_url(username))
            .header(reqwest::header::AUTHORIZATION, &self.secret)
            .send()
            .await?;
        if resp.status() == 404 {
            return Ok(None);
        }
        let resp = check_response(resp, username).await?;
        let dto: UserDto = resp.json().await?;
        Ok(Some(dto.into()))
    }

    /// Send `user` and return the stored version.
    ///
    /// Some deployments answer writes with an empty body; the sent record is
    /// then taken as stored.
    async fn store(
        &self,
        request: reqwest::RequestBuilder,
        user: &UserRecord,
    ) -> Result<UserRecord, ClientError> {
        let resp = request
            .header(reqwest::header::AUTHORIZATION, &self.secret)
            .json(&UserDto::from(user))
            .send()
            .await?;
        let resp = check_response(resp, &user.federated_id).await?;
        let stored: Option<UserDto> = read_optional_json(resp).await?;
        Ok(stored.map_or_else(|| user.clone(), UserRecord::from))
    }
}

#[async_trait]
impl UserCatalogue for UserApiClient {
    #[instrument(skip(self), level = "debug")]
    async fn get_user(&self, federated_id: &str) -> Result<Option<UserRecord>, CatalogueError> {
        Ok(self.fetch(federated_id).await?)
    }

    #[instrument(skip_all, fields(username = %user.federated_id), level = "debug")]
    async fn create_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError> {
        let request = self.http.post(self.collection_url());
        Ok(self.store(request, user).await?)
    }

    #[instrument(skip_all, fields(username = %user.federated_id), level = "debug")]
    async fn update_user(&self, user: &UserRecord) -> Result<UserRecord, CatalogueError> {
        let request = self.http.put(self.user_url(&user.federated_id));
        Ok(self.store(request, user).await?)
    }
}
