//! Repository for the `notifications` table.

use livix_core::ports::NewNotification;
use livix_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "id, user_id, title, message, type, link, related_id, is_read, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert a notification for a user, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &NewNotification) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO notifications (user_id, title, message, type, link, related_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(&input.message)
        .bind(input.kind.as_str())
        .bind(input.link.as_deref())
        .bind(input.related_id.as_deref())
        .fetch_one(pool)
        .await
    }

    /// List a user's notifications, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
