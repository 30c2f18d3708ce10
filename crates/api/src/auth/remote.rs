//! Token exchange with the hosted auth service.
//!
//! `GET {base_url}/auth/v1/user` with the caller's bearer token and the
//! project anon key. A 2xx answer carrying a UUID `id` identifies the
//! caller; anything else is a rejection.

use std::time::Duration;

use async_trait::async_trait;
use livix_core::types::{parse_id, DbId};
use serde::Deserialize;

use super::{AuthError, IdentityProvider};

/// Upper bound on one token exchange.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct RemoteAuthConfig {
    /// Base URL of the auth service, without trailing path.
    pub base_url: String,
    /// Public anon key sent as the `apikey` header.
    pub anon_key: String,
}

#[derive(Deserialize)]
struct UserResponse {
    id: Option<String>,
}

pub struct RemoteIdentityProvider {
    client: reqwest::Client,
    user_url: String,
    anon_key: String,
}

impl RemoteIdentityProvider {
    pub fn new(config: RemoteAuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            user_url: format!("{}/auth/v1/user", config.base_url.trim_end_matches('/')),
            anon_key: config.anon_key,
        })
    }
}

#[async_trait]
impl IdentityProvider for RemoteIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<DbId, AuthError> {
        let response = self
            .client
            .get(&self.user_url)
            .bearer_auth(token)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| AuthError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(format!("auth service returned {status}")));
        }

        let user: UserResponse = response
            .json()
            .await
            .map_err(|e| AuthError::Rejected(e.to_string()))?;

        parse_id(user.id.as_deref())
            .ok_or_else(|| AuthError::Rejected("no user id in response".into()))
    }
}
