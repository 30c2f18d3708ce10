use std::net::SocketAddr;
use std::sync::Arc;

use livix_core::authorization::Authorizer;
use livix_db::PgStore;
use livix_events::{Dispatcher, EmailError, EmailGateway, ResendGateway, SmtpGateway};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use livix_api::auth::{build_identity_provider, AuthError};
use livix_api::config::{ConfigError, MailerConfig, ServerConfig};
use livix_api::router::build_app_router;
use livix_api::state::AppState;

/// Anything that stops the server from starting.
#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("identity provider: {0}")]
    Auth(#[from] AuthError),
    #[error("email gateway: {0}")]
    Email(#[from] EmailError),
    #[error("database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("invalid HOST address '{0}'")]
    Host(String),
    #[error("server: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "livix_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    // --- Configuration ---
    let config = ServerConfig::from_env()?;
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = livix_db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    livix_db::health_check(&pool).await?;
    tracing::info!("Database health check passed");

    let store = Arc::new(PgStore::new(pool));

    // --- Auth ---
    let identity = build_identity_provider(&config.auth)?;

    // --- Email ---
    let mailer: Option<Arc<dyn EmailGateway>> = match &config.mailer {
        MailerConfig::Resend(resend) => Some(Arc::new(ResendGateway::new(resend.clone())?)),
        MailerConfig::Smtp(smtp) => Some(Arc::new(SmtpGateway::new(smtp.clone()))),
        MailerConfig::Disabled => None,
    };
    match &mailer {
        Some(m) => tracing::info!(gateway = m.name(), "Email gateway configured"),
        None => tracing::warn!("No email gateway configured, notification emails are disabled"),
    }

    // --- App state ---
    let state = AppState {
        config: Arc::new(config.clone()),
        identity,
        authorizer: Authorizer::new(store.clone()),
        dispatcher: Dispatcher::new(store, mailer),
    };

    let app = build_app_router(state)?;

    // --- Start server ---
    let ip = config
        .host
        .parse()
        .map_err(|_| StartupError::Host(config.host.clone()))?;
    let addr = SocketAddr::new(ip, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
