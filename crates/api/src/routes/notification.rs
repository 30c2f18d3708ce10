//! Route definitions for notification delivery.

use axum::routing::post;
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// ```text
/// POST   /send-notification         -> send_notification
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/send-notification", post(notification::send_notification))
}
