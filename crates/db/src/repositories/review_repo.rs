//! Repository for the `reviews` table.

use livix_core::types::DbId;
use sqlx::PgPool;

use crate::models::relationship::ReviewRow;

pub struct ReviewRepo;

impl ReviewRepo {
    /// Fetch the author (student) and subject (landlord) of a review.
    pub async fn find_parties(pool: &PgPool, id: DbId) -> Result<Option<ReviewRow>, sqlx::Error> {
        sqlx::query_as::<_, ReviewRow>("SELECT student_id, landlord_id FROM reviews WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
