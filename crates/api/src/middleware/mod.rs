//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token.

pub mod auth;
