//! Auth admin API adapter resolving account emails.

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use super::client::{SupabaseClient, status_message};
use super::dto::AdminUserDto;
use crate::domain::ports::{IdentityResolver, IdentityResolverError};
use crate::domain::{EmailAddress, UserId};

/// Identity resolver calling `GET /auth/v1/admin/users/{id}`.
#[derive(Clone)]
pub struct SupabaseIdentityResolver {
    client: SupabaseClient,
}

impl SupabaseIdentityResolver {
    /// Create an adapter using a shared client.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentityResolver for SupabaseIdentityResolver {
    async fn resolve_email(
        &self,
        user: &UserId,
    ) -> Result<Option<EmailAddress>, IdentityResolverError> {
        let url = self
            .client
            .endpoint(&["auth", "v1", "admin", "users", user.as_ref()])
            .map_err(IdentityResolverError::lookup)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| IdentityResolverError::connection(error.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityResolverError::connection(error.to_string()))?;
        if status == StatusCode::NOT_FOUND {
            debug!(user = %user, "user not found in identity provider");
            return Ok(None);
        }
        if !status.is_success() {
            return Err(IdentityResolverError::lookup(status_message(status, &body)));
        }

        let decoded: AdminUserDto = serde_json::from_slice(&body).map_err(|error| {
            IdentityResolverError::lookup(format!("invalid admin user payload: {error}"))
        })?;
        Ok(decoded.into_email())
    }
}
