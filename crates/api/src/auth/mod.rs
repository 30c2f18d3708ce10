//! Caller authentication.
//!
//! - [`jwt`] -- local verification of HS256 access tokens.
//! - [`remote`] -- token exchange with the hosted auth service.
//!
//! Both implement [`IdentityProvider`]; [`build_identity_provider`] picks
//! one from [`AuthConfig`].

use std::sync::Arc;

use async_trait::async_trait;
use livix_core::types::DbId;

use crate::config::AuthConfig;

pub mod jwt;
pub mod remote;

/// Why a bearer token did not resolve to a caller.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is malformed, expired, or names no principal.
    #[error("token rejected: {0}")]
    Rejected(String),

    /// The identity provider could not be reached.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Resolves a bearer token to the caller's user id.
///
/// Implementations make exactly one verification attempt.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<DbId, AuthError>;
}

pub fn build_identity_provider(
    config: &AuthConfig,
) -> Result<Arc<dyn IdentityProvider>, AuthError> {
    Ok(match config {
        AuthConfig::Jwt(jwt) => Arc::new(jwt::JwtIdentityProvider::new(jwt.clone())),
        AuthConfig::Remote(remote) => Arc::new(remote::RemoteIdentityProvider::new(remote.clone())?),
    })
}
