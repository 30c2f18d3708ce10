//! Handler for `POST /api/v1/send-notification`.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use livix_core::error::CoreError;
use livix_core::notification::{NotificationRequest, RawNotificationRequest};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const MSG_FORBIDDEN: &str = "Not authorized to send this notification";
pub const MSG_INVALID_BODY: &str = "Invalid request body";

#[derive(Debug, Serialize)]
pub struct SendNotificationResponse {
    pub success: bool,
}

/// POST /api/v1/send-notification
///
/// Authenticate, validate the body, authorize the caller against the
/// target, then persist and email. Nothing touches the store before the
/// body is valid.
pub async fn send_notification(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<SendNotificationResponse>> {
    let raw: RawNotificationRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest(MSG_INVALID_BODY.into()))?;
    let request = NotificationRequest::from_raw(raw)?;
    let kind = request.payload.kind();

    let Some(grant) = state
        .authorizer
        .grant(auth.user_id, request.target, &request.payload)
        .await?
    else {
        tracing::warn!(
            caller = %auth.user_id,
            target = %request.target,
            kind = %kind,
            "Unauthorized notification attempt"
        );
        return Err(AppError::Core(CoreError::Forbidden(MSG_FORBIDDEN.into())));
    };

    let outcome = state
        .dispatcher
        .dispatch(request.target, &request.payload)
        .await?;

    tracing::info!(
        caller = %auth.user_id,
        target = %request.target,
        kind = %kind,
        ?grant,
        notification_id = %outcome.notification_id,
        "Notification sent"
    );

    Ok(Json(SendNotificationResponse { success: true }))
}
