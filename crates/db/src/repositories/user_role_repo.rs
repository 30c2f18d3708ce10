//! Repository for the `user_roles` table.

use livix_core::types::DbId;
use sqlx::PgPool;

pub struct UserRoleRepo;

impl UserRoleRepo {
    /// Whether the user holds the given role.
    pub async fn has_role(pool: &PgPool, user_id: DbId, role: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(pool)
        .await
    }
}
