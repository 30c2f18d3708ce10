//! Postgres adapter for the `livix-core` store ports.

use async_trait::async_trait;
use livix_core::ports::{
    ApplicationParties, ConversationParticipants, NewNotification, NotificationStore, Recipient,
    RelationshipStore, ReviewParties, StoreError,
};
use livix_core::roles::ROLE_ADMIN;
use livix_core::types::DbId;

use crate::repositories::{
    ApplicationRepo, ConversationRepo, NotificationRepo, ProfileRepo, ReviewRepo, UserRoleRepo,
};
use crate::DbPool;

/// Implements [`RelationshipStore`] and [`NotificationStore`] over a pool.
///
/// Every method issues exactly one statement; nothing is wrapped in a
/// transaction.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx error into the port error, keeping the detail for logs.
fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed => StoreError::connection(err.to_string()),
        other => StoreError::query(other.to_string()),
    }
}

#[async_trait]
impl RelationshipStore for PgStore {
    async fn is_admin(&self, user_id: DbId) -> Result<bool, StoreError> {
        UserRoleRepo::has_role(&self.pool, user_id, ROLE_ADMIN)
            .await
            .map_err(store_error)
    }

    async fn find_application(&self, id: DbId) -> Result<Option<ApplicationParties>, StoreError> {
        let row = ApplicationRepo::find_parties(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_conversation(
        &self,
        id: DbId,
    ) -> Result<Option<ConversationParticipants>, StoreError> {
        let row = ConversationRepo::find_participants(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_review(&self, id: DbId) -> Result<Option<ReviewParties>, StoreError> {
        let row = ReviewRepo::find_parties(&self.pool, id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn find_recipient(&self, user_id: DbId) -> Result<Option<Recipient>, StoreError> {
        let row = ProfileRepo::find_contact(&self.pool, user_id)
            .await
            .map_err(store_error)?;
        Ok(row.map(Into::into))
    }

    async fn insert_notification(
        &self,
        notification: &NewNotification,
    ) -> Result<DbId, StoreError> {
        let id = NotificationRepo::create(&self.pool, notification)
            .await
            .map_err(store_error)?;
        tracing::debug!(
            notification_id = %id,
            user_id = %notification.user_id,
            kind = %notification.kind,
            "Notification row inserted"
        );
        Ok(id)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(store_error)
    }
}
