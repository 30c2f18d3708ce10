//! Local verification of HS256 access tokens.
//!
//! Tokens are issued by the hosted auth service and signed with the project
//! secret. The caller id is the `sub` claim; `exp` and `aud` are checked.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use livix_core::types::DbId;
use serde::{Deserialize, Serialize};

use super::{AuthError, IdentityProvider};

/// Audience carried by access tokens of signed-in users.
pub const DEFAULT_AUDIENCE: &str = "authenticated";

/// Role claim of signed-in users.
pub const DEFAULT_ROLE: &str = "authenticated";

/// Claims read from an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's id.
    pub sub: DbId,
    pub aud: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to verify tokens.
    pub secret: String,
    /// Required `aud` claim.
    pub audience: String,
}

/// Issue an access token for `user_id` valid for `ttl_secs`.
///
/// Used by local tooling and tests; production tokens come from the auth
/// service.
pub fn issue_token(
    user_id: DbId,
    ttl_secs: i64,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        aud: config.audience.clone(),
        exp: now + ttl_secs,
        iat: now,
        role: Some(DEFAULT_ROLE.to_string()),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[config.audience.as_str()]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

pub struct JwtIdentityProvider {
    config: JwtConfig,
}

impl JwtIdentityProvider {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<DbId, AuthError> {
        validate_token(token, &self.config)
            .map(|claims| claims.sub)
            .map_err(|e| AuthError::Rejected(e.to_string()))
    }
}
