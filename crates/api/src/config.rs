use livix_events::{EmailConfig, ResendConfig, SEND_TIMEOUT};

use crate::auth::jwt::{JwtConfig, DEFAULT_AUDIENCE};
use crate::auth::remote::{self, RemoteAuthConfig};

/// Smallest accepted `REQUEST_TIMEOUT_SECS`.
///
/// The row is committed before the email goes out, so the request budget
/// must cover one token exchange plus one email send; otherwise a
/// persisted notification could be answered with 408.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 =
    remote::REQUEST_TIMEOUT.as_secs() + SEND_TIMEOUT.as_secs() + 5;

/// Error raised when the environment cannot produce a usable configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// How callers are authenticated.
#[derive(Debug, Clone)]
pub enum AuthConfig {
    /// Verify HS256 access tokens locally.
    Jwt(JwtConfig),
    /// Exchange tokens with the hosted auth service.
    Remote(RemoteAuthConfig),
}

/// Which email gateway, if any, delivers notification emails.
#[derive(Debug, Clone)]
pub enum MailerConfig {
    Resend(ResendConfig),
    Smtp(EmailConfig),
    Disabled,
}

/// Server configuration loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins; `["*"]` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`, at least
    /// [`MIN_REQUEST_TIMEOUT_SECS`]).
    pub request_timeout_secs: u64,
    pub database_url: String,
    pub auth: AuthConfig,
    pub mailer: MailerConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default          |
    /// |------------------------|------------------|
    /// | `HOST`                 | `0.0.0.0`        |
    /// | `PORT`                 | `3000`           |
    /// | `CORS_ORIGINS`         | `*`              |
    /// | `REQUEST_TIMEOUT_SECS` | `30`             |
    /// | `DATABASE_URL`         | **required**     |
    /// | `AUTH_JWT_SECRET`      | --               |
    /// | `AUTH_JWT_AUDIENCE`    | `authenticated`  |
    /// | `AUTH_URL`             | required without `AUTH_JWT_SECRET` |
    /// | `AUTH_ANON_KEY`        | required without `AUTH_JWT_SECRET` |
    ///
    /// Email gateway variables are documented on [`ResendConfig`] and
    /// [`EmailConfig`]. Resend wins when both are configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = parse_or("PORT", lookup("PORT"), 3000)?;
        let request_timeout_secs =
            parse_or("REQUEST_TIMEOUT_SECS", lookup("REQUEST_TIMEOUT_SECS"), 30)?;
        if request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                value: request_timeout_secs.to_string(),
            });
        }

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = non_empty(lookup("DATABASE_URL"))
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let auth = match non_empty(lookup("AUTH_JWT_SECRET")) {
            Some(secret) => AuthConfig::Jwt(JwtConfig {
                secret,
                audience: non_empty(lookup("AUTH_JWT_AUDIENCE"))
                    .unwrap_or_else(|| DEFAULT_AUDIENCE.into()),
            }),
            None => AuthConfig::Remote(RemoteAuthConfig {
                base_url: non_empty(lookup("AUTH_URL")).ok_or(ConfigError::Missing("AUTH_URL"))?,
                anon_key: non_empty(lookup("AUTH_ANON_KEY"))
                    .ok_or(ConfigError::Missing("AUTH_ANON_KEY"))?,
            }),
        };

        let mailer = if let Some(resend) = ResendConfig::from_lookup(&lookup) {
            MailerConfig::Resend(resend)
        } else if let Some(smtp) = EmailConfig::from_lookup(&lookup) {
            MailerConfig::Smtp(smtp)
        } else {
            MailerConfig::Disabled
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            auth,
            mailer,
        })
    }

    /// Whether CORS should answer with `Access-Control-Allow-Origin: *`.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
    }
}
