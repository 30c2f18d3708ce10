//! Repository for the `applications` table.

use livix_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::ApplicationRow;

pub struct ApplicationRepo;

impl ApplicationRepo {
    /// Fetch the landlord and student of an application.
    pub async fn find_parties(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ApplicationRow>, sqlx::Error> {
        sqlx::query_as::<_, ApplicationRow>(
            "SELECT landlord_id, student_id FROM applications WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }
}
