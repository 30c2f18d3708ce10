//! Bearer-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use livix_core::error::CoreError;
use livix_core::types::DbId;

use crate::auth::AuthError;
use crate::error::AppError;
use crate::state::AppState;

pub const MSG_UNAUTHORIZED: &str = "Unauthorized";
pub const MSG_INVALID_TOKEN: &str = "Invalid token";

/// Authenticated caller extracted from the `Authorization` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = %user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| unauthorized(MSG_UNAUTHORIZED))?;

        let token = auth_header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| unauthorized(MSG_INVALID_TOKEN))?;

        let user_id = state.identity.resolve(token).await.map_err(|e| {
            match &e {
                AuthError::Rejected(reason) => {
                    tracing::debug!(reason = %reason, "Bearer token rejected");
                }
                AuthError::Unavailable(reason) => {
                    tracing::error!(reason = %reason, "Identity provider unavailable");
                }
            }
            unauthorized(MSG_INVALID_TOKEN)
        })?;

        Ok(AuthUser { user_id })
    }
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}
