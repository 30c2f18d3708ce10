//! Decides whether a caller may address a notification to a target user.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. a user may always notify themselves;
//! 2. admins may notify anyone about anything;
//! 3. otherwise the payload must name a relationship row that links caller
//!    and target (see [`Authorizer::is_authorized`]);
//! 4. everything else is denied.
//!
//! A denial is `Ok(false)`. Only store failures are errors.

use std::sync::Arc;

use crate::notification::{NotificationPayload, RelationshipRef};
use crate::ports::{RelationshipStore, StoreError};
use crate::types::DbId;

/// Which rule granted a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    SelfNotification,
    Admin,
    Application,
    Conversation,
    Review,
}

/// Relationship-based authorization over a [`RelationshipStore`].
#[derive(Clone)]
pub struct Authorizer {
    store: Arc<dyn RelationshipStore>,
}

impl Authorizer {
    pub fn new(store: Arc<dyn RelationshipStore>) -> Self {
        Self { store }
    }

    /// `true` iff some rule grants `caller` the right to notify `target`.
    pub async fn is_authorized(
        &self,
        caller: DbId,
        target: DbId,
        payload: &NotificationPayload,
    ) -> Result<bool, StoreError> {
        Ok(self.grant(caller, target, payload).await?.is_some())
    }

    /// The rule that grants the notification, or `None` when denied.
    ///
    /// - Application kinds: caller and target are the landlord and the
    ///   student of the application, in either direction.
    /// - `message`: caller is a participant and target is the other one.
    /// - `review`: caller wrote the review and target is the reviewed
    ///   landlord. Never the reverse.
    /// - `custom`: no relationship can grant it.
    pub async fn grant(
        &self,
        caller: DbId,
        target: DbId,
        payload: &NotificationPayload,
    ) -> Result<Option<Grant>, StoreError> {
        if caller == target {
            return Ok(Some(Grant::SelfNotification));
        }

        if self.store.is_admin(caller).await? {
            return Ok(Some(Grant::Admin));
        }

        let granted = match payload.relationship() {
            RelationshipRef::Application(Some(id)) => self
                .store
                .find_application(id)
                .await?
                .is_some_and(|app| app.links(caller, target))
                .then_some(Grant::Application),
            RelationshipRef::Conversation(Some(id)) => self
                .store
                .find_conversation(id)
                .await?
                .is_some_and(|conv| conv.other_than(caller) == Some(target))
                .then_some(Grant::Conversation),
            RelationshipRef::Review(Some(id)) => self
                .store
                .find_review(id)
                .await?
                .is_some_and(|review| review.student_id == caller && review.landlord_id == target)
                .then_some(Grant::Review),
            RelationshipRef::Application(None)
            | RelationshipRef::Conversation(None)
            | RelationshipRef::Review(None)
            | RelationshipRef::Unrelated => None,
        };

        Ok(granted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
