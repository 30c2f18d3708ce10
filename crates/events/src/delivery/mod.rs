//! Outbound email gateways.
//!
//! [`EmailGateway`] is the seam the dispatcher sends through. Two
//! implementations exist: [`resend::ResendGateway`] for the Resend HTTP API
//! and [`email::SmtpGateway`] for a plain SMTP relay.

use std::time::Duration;

use async_trait::async_trait;

pub mod email;
pub mod resend;

/// Upper bound on a single send through any gateway.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// A fully rendered email ready to hand to a gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status code.
    #[error("Email gateway returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Sends one rendered email. Implementations make a single attempt.
#[async_trait]
pub trait EmailGateway: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn send(&self, email: &OutgoingEmail) -> Result<(), EmailError>;
}
