//! Store ports used by the authorizer and the dispatcher.
//!
//! The Postgres adapter in `livix-db` implements both traits; HTTP tests
//! substitute in-memory fakes. Each method is a single-row lookup or write
//! and adapters must not retry.

use async_trait::async_trait;

use crate::notification::NotificationKind;
use crate::types::DbId;

/// Failures raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// A query or insert failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// The two parties of a rental application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationParties {
    pub landlord_id: DbId,
    pub student_id: DbId,
}

impl ApplicationParties {
    /// Whether `from` and `to` are the two parties, in either direction.
    pub fn links(&self, from: DbId, to: DbId) -> bool {
        (from == self.landlord_id && to == self.student_id)
            || (from == self.student_id && to == self.landlord_id)
    }
}

/// The two participants of a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationParticipants {
    pub participant_1_id: DbId,
    pub participant_2_id: DbId,
}

impl ConversationParticipants {
    /// The participant that is not `id`, or `None` if `id` is not a participant.
    pub fn other_than(&self, id: DbId) -> Option<DbId> {
        if id == self.participant_1_id {
            Some(self.participant_2_id)
        } else if id == self.participant_2_id {
            Some(self.participant_1_id)
        } else {
            None
        }
    }
}

/// Author and subject of a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewParties {
    /// The student who wrote the review.
    pub student_id: DbId,
    /// The landlord being reviewed.
    pub landlord_id: DbId,
}

/// Delivery details of a notification target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub id: DbId,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// An in-app notification row to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    pub link: Option<String>,
    pub related_id: Option<String>,
}

/// Read-only lookups over the tables that relate two users.
#[async_trait]
pub trait RelationshipStore: Send + Sync {
    /// Whether the user holds the admin role.
    async fn is_admin(&self, user_id: DbId) -> Result<bool, StoreError>;

    async fn find_application(&self, id: DbId) -> Result<Option<ApplicationParties>, StoreError>;

    async fn find_conversation(
        &self,
        id: DbId,
    ) -> Result<Option<ConversationParticipants>, StoreError>;

    async fn find_review(&self, id: DbId) -> Result<Option<ReviewParties>, StoreError>;
}

/// Recipient lookup and notification persistence.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, StoreError>;

    /// Insert one notification row, returning its id.
    async fn insert_notification(&self, notification: &NewNotification)
        -> Result<DbId, StoreError>;

    /// Cheap connectivity check used by the health endpoint.
    async fn health_check(&self) -> Result<(), StoreError>;
}
