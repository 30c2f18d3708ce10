//! Notification entity model.

use serde::Serialize;
use sqlx::FromRow;
use livix_core::types::{DbId, Timestamp};

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub link: Option<String>,
    pub related_id: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
}
