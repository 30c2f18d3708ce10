#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use livix_core::authorization::Authorizer;
use livix_core::ports::{
    ApplicationParties, ConversationParticipants, NewNotification, NotificationStore, Recipient,
    RelationshipStore, ReviewParties, StoreError,
};
use livix_core::types::DbId;
use livix_events::{Dispatcher, EmailError, EmailGateway, OutgoingEmail};
use tower::ServiceExt;
use uuid::Uuid;

use livix_api::auth::{AuthError, IdentityProvider};
use livix_api::auth::jwt::{issue_token, JwtConfig, JwtIdentityProvider, DEFAULT_AUDIENCE};
use livix_api::config::{AuthConfig, MailerConfig, ServerConfig};
use livix_api::router::build_app_router;
use livix_api::state::AppState;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["*".to_string()],
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        auth: AuthConfig::Jwt(jwt_config()),
        mailer: MailerConfig::Disabled,
    }
}

pub fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        audience: DEFAULT_AUDIENCE.to_string(),
    }
}

/// A valid bearer token for `user`.
pub fn token_for(user: DbId) -> String {
    issue_token(user, 900, &jwt_config()).expect("token issue should succeed")
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store fake that counts every call so tests can assert "no store access".
#[derive(Default)]
pub struct MemoryStore {
    pub admins: HashSet<DbId>,
    pub applications: HashMap<DbId, ApplicationParties>,
    pub conversations: HashMap<DbId, ConversationParticipants>,
    pub reviews: HashMap<DbId, ReviewParties>,
    pub profiles: HashMap<DbId, Recipient>,
    pub inserted: Mutex<Vec<NewNotification>>,
    pub calls: AtomicUsize,
    pub relationships_down: AtomicBool,
    pub insert_fails: AtomicBool,
}

impl MemoryStore {
    pub fn with_profile(mut self, id: DbId, email: &str) -> Self {
        self.profiles.insert(
            id,
            Recipient {
                id,
                email: Some(email.to_string()),
                name: None,
            },
        );
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inserted(&self) -> Vec<NewNotification> {
        self.inserted.lock().unwrap().clone()
    }

    fn touch(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.relationships_down.load(Ordering::SeqCst) {
            return Err(StoreError::connection("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RelationshipStore for MemoryStore {
    async fn is_admin(&self, user_id: DbId) -> Result<bool, StoreError> {
        self.touch()?;
        Ok(self.admins.contains(&user_id))
    }

    async fn find_application(&self, id: DbId) -> Result<Option<ApplicationParties>, StoreError> {
        self.touch()?;
        Ok(self.applications.get(&id).copied())
    }

    async fn find_conversation(
        &self,
        id: DbId,
    ) -> Result<Option<ConversationParticipants>, StoreError> {
        self.touch()?;
        Ok(self.conversations.get(&id).copied())
    }

    async fn find_review(&self, id: DbId) -> Result<Option<ReviewParties>, StoreError> {
        self.touch()?;
        Ok(self.reviews.get(&id).copied())
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.get(&user_id).cloned())
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<DbId, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.insert_fails.load(Ordering::SeqCst) {
            return Err(StoreError::query("insert rejected"));
        }
        self.inserted.lock().unwrap().push(notification.clone());
        Ok(Uuid::new_v4())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        if self.relationships_down.load(Ordering::SeqCst) {
            return Err(StoreError::connection("connection refused"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Recording email gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingGateway {
    pub sent: Mutex<Vec<OutgoingEmail>>,
    pub fail: AtomicBool,
}

impl RecordingGateway {
    pub fn failing() -> Self {
        Self {
            fail: AtomicBool::new(true),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailGateway for RecordingGateway {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(email.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::HttpStatus {
                status: 503,
                body: "unavailable".into(),
            });
        }
        Ok(())
    }
}

/// Identity provider whose backing auth service cannot be reached.
pub struct UnreachableIdentity;

#[async_trait]
impl IdentityProvider for UnreachableIdentity {
    async fn resolve(&self, _token: &str) -> Result<DbId, AuthError> {
        Err(AuthError::Unavailable("connection refused".into()))
    }
}

// ---------------------------------------------------------------------------
// App builder
// ---------------------------------------------------------------------------

/// Build the full application router over the given fakes.
///
/// Uses [`build_app_router`] so tests exercise the same middleware stack
/// (CORS, request ID, timeout, tracing, panic recovery) that production uses.
pub fn build_test_app(store: Arc<MemoryStore>, mailer: Option<Arc<RecordingGateway>>) -> Router {
    build_test_app_with_identity(
        store,
        mailer,
        Arc::new(JwtIdentityProvider::new(jwt_config())),
    )
}

/// Like [`build_test_app`], with a custom identity provider.
pub fn build_test_app_with_identity(
    store: Arc<MemoryStore>,
    mailer: Option<Arc<RecordingGateway>>,
    identity: Arc<dyn IdentityProvider>,
) -> Router {
    let state = AppState {
        config: Arc::new(test_config()),
        identity,
        authorizer: Authorizer::new(store.clone()),
        dispatcher: Dispatcher::new(
            store,
            mailer.map(|m| m as Arc<dyn EmailGateway>),
        ),
    };
    build_app_router(state).expect("test router should build")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a raw body to the send endpoint, with an optional `Authorization`
/// header value.
pub async fn post_send(app: Router, authorization: Option<&str>, body: &str) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/send-notification")
        .header("content-type", "application/json");
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// POST a JSON body as `caller`.
pub async fn send_as(app: Router, caller: DbId, body: serde_json::Value) -> Response<Body> {
    let auth = format!("Bearer {}", token_for(caller));
    post_send(app, Some(&auth), &body.to_string()).await
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
