//! Repository for the `conversations` table.

use livix_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::ConversationRow;

pub struct ConversationRepo;

impl ConversationRepo {
    /// Fetch both participants of a conversation.
    pub async fn find_participants(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConversationRow>, sqlx::Error> {
        sqlx::query_as::<_, ConversationRow>(
            "SELECT participant_1_id, participant_2_id FROM conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
