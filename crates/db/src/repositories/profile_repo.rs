//! Repository for the `profiles` table.

use livix_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::ProfileContact;

pub struct ProfileRepo;

impl ProfileRepo {
    /// Fetch the delivery columns of a profile.
    pub async fn find_contact(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProfileContact>, sqlx::Error> {
        sqlx::query_as::<_, ProfileContact>("SELECT id, email, name FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
