use livix_core::ports::Recipient;
use livix_core::types::DbId;
use sqlx::FromRow;

/// Delivery columns of a row in `profiles`.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileContact {
    pub id: DbId,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl From<ProfileContact> for Recipient {
    fn from(row: ProfileContact) -> Self {
        Self {
            id: row.id,
            email: row.email,
            name: row.name,
        }
    }
}
