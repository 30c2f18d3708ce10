//! Livix notification delivery.
//!
//! This crate turns an authorized send request into side effects:
//!
//! - [`Dispatcher`] -- persists the in-app notification and, best effort,
//!   emails the recipient.
//! - [`templates`] -- one HTML email template per notification kind.
//! - [`delivery`] -- outbound email gateways (Resend HTTP API, SMTP).

pub mod delivery;
pub mod dispatcher;
pub mod templates;

pub use delivery::email::{EmailConfig, SmtpGateway};
pub use delivery::resend::{ResendConfig, ResendGateway};
pub use delivery::{EmailError, EmailGateway, OutgoingEmail, SEND_TIMEOUT};
pub use dispatcher::{DispatchError, DispatchOutcome, Dispatcher, EmailOutcome};
