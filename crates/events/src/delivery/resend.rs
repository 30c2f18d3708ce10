//! Email delivery via the Resend HTTP API.
//!
//! [`ResendGateway`] POSTs `{from, to, subject, html}` with the API key as
//! a bearer credential. One attempt per email; a non-2xx answer is returned
//! as [`EmailError::HttpStatus`] with the response body for the logs.

use async_trait::async_trait;
use serde::Serialize;

use super::{EmailError, EmailGateway, OutgoingEmail, SEND_TIMEOUT};

/// Default Resend endpoint.
pub const DEFAULT_RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Default sender mailbox.
const DEFAULT_FROM: &str = "Livix <noreply@livix.app>";

// ---------------------------------------------------------------------------
// ResendConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ResendConfig {
    pub api_key: String,
    pub api_url: String,
    pub from: String,
}

impl ResendConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable         | Required | Default                          |
    /// |------------------|----------|----------------------------------|
    /// | `RESEND_API_KEY` | yes      | --                               |
    /// | `RESEND_API_URL` | no       | `https://api.resend.com/emails`  |
    /// | `EMAIL_FROM`     | no       | `Livix <noreply@livix.app>`      |
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Returns `None` if `RESEND_API_KEY` is absent or empty, which disables
    /// this gateway.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup("RESEND_API_KEY").filter(|k| !k.is_empty())?;
        Some(Self {
            api_key,
            api_url: lookup("RESEND_API_URL").unwrap_or_else(|| DEFAULT_RESEND_API_URL.to_string()),
            from: lookup("EMAIL_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()),
        })
    }
}

// ---------------------------------------------------------------------------
// ResendGateway
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

/// Sends emails through the Resend API.
pub struct ResendGateway {
    client: reqwest::Client,
    config: ResendConfig,
}

impl ResendGateway {
    pub fn new(config: ResendConfig) -> Result<Self, EmailError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl EmailGateway for ResendGateway {
    fn name(&self) -> &'static str {
        "resend"
    }

    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError> {
        let body = SendEmailBody {
            from: &self.config.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, "Notification email sent via Resend");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
