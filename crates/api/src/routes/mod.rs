pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /send-notification                               POST (auth required)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(notification::router())
}
