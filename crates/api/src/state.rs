use std::sync::Arc;

use livix_core::authorization::Authorizer;
use livix_events::Dispatcher;

use crate::auth::IdentityProvider;
use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Resolves bearer tokens to callers.
    pub identity: Arc<dyn IdentityProvider>,
    pub authorizer: Authorizer,
    /// Persists notifications and sends their emails.
    pub dispatcher: Dispatcher,
}
