//! Notification dispatch.
//!
//! [`Dispatcher::dispatch`] persists one in-app notification for an already
//! authorized target and then, best effort, emails the recipient. The
//! persisted row is the result of the operation; the email outcome is only
//! reported for logging.

use std::sync::Arc;

use livix_core::notification::NotificationPayload;
use livix_core::ports::{NewNotification, NotificationStore, Recipient, StoreError};
use livix_core::types::DbId;

use crate::delivery::{EmailGateway, OutgoingEmail};
use crate::templates;

/// Why a dispatch did not persist a notification.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The target has no profile, or the profile has no email address.
    #[error("Recipient {0} not found")]
    RecipientNotFound(DbId),

    /// The recipient lookup failed.
    #[error("Recipient lookup failed: {0}")]
    Lookup(StoreError),

    /// The notification row could not be inserted.
    #[error("Notification insert failed: {0}")]
    Persistence(StoreError),
}

/// What happened to the email half of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailOutcome {
    Sent,
    Failed,
    /// No gateway is configured.
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub notification_id: DbId,
    pub email: EmailOutcome,
}

/// Persists notifications and sends their emails.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn NotificationStore>,
    mailer: Option<Arc<dyn EmailGateway>>,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn NotificationStore>, mailer: Option<Arc<dyn EmailGateway>>) -> Self {
        Self { store, mailer }
    }

    /// Check that the underlying store answers.
    pub async fn health_check(&self) -> Result<(), StoreError> {
        self.store.health_check().await
    }

    /// Deliver `payload` to `target`.
    ///
    /// The caller must already be authorized. Returns once the row is
    /// persisted; email failures are logged and folded into the outcome.
    pub async fn dispatch(
        &self,
        target: DbId,
        payload: &NotificationPayload,
    ) -> Result<DispatchOutcome, DispatchError> {
        let recipient = self
            .store
            .find_recipient(target)
            .await
            .map_err(DispatchError::Lookup)?
            .ok_or(DispatchError::RecipientNotFound(target))?;

        let Some(email_address) = recipient.email.as_deref().filter(|e| !e.is_empty()) else {
            return Err(DispatchError::RecipientNotFound(target));
        };

        let notification_id = self
            .store
            .insert_notification(&new_notification(&recipient, payload))
            .await
            .map_err(DispatchError::Persistence)?;

        let email = self.send_email(email_address, payload).await;

        tracing::debug!(
            notification_id = %notification_id,
            user_id = %target,
            kind = %payload.kind(),
            email = ?email,
            "Notification dispatched"
        );

        Ok(DispatchOutcome {
            notification_id,
            email,
        })
    }

    async fn send_email(&self, to: &str, payload: &NotificationPayload) -> EmailOutcome {
        let Some(mailer) = &self.mailer else {
            tracing::debug!(kind = %payload.kind(), "No email gateway configured, skipping email");
            return EmailOutcome::Disabled;
        };

        let rendered = templates::render(payload);
        let email = OutgoingEmail {
            to: to.to_string(),
            subject: rendered.subject,
            html: templates::wrap_layout(&rendered.html),
        };

        match mailer.send(&email).await {
            Ok(()) => EmailOutcome::Sent,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    gateway = mailer.name(),
                    kind = %payload.kind(),
                    "Failed to send notification email"
                );
                EmailOutcome::Failed
            }
        }
    }
}

fn new_notification(recipient: &Recipient, payload: &NotificationPayload) -> NewNotification {
    let common = payload.common();
    NewNotification {
        user_id: recipient.id,
        title: common.title().to_string(),
        message: common.body().to_string(),
        kind: payload.kind(),
        link: common.action_url.clone(),
        related_id: common.related_id.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
