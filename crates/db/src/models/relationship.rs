//! Rows of the tables that relate two users.
//!
//! Only the columns the authorizer needs are selected.

use livix_core::ports::{ApplicationParties, ConversationParticipants, ReviewParties};
use livix_core::types::DbId;
use sqlx::FromRow;

/// Parties of a row in `applications`.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationRow {
    pub landlord_id: DbId,
    pub student_id: DbId,
}

impl From<ApplicationRow> for ApplicationParties {
    fn from(row: ApplicationRow) -> Self {
        Self {
            landlord_id: row.landlord_id,
            student_id: row.student_id,
        }
    }
}

/// Participants of a row in `conversations`.
#[derive(Debug, Clone, FromRow)]
pub struct ConversationRow {
    pub participant_1_id: DbId,
    pub participant_2_id: DbId,
}

impl From<ConversationRow> for ConversationParticipants {
    fn from(row: ConversationRow) -> Self {
        Self {
            participant_1_id: row.participant_1_id,
            participant_2_id: row.participant_2_id,
        }
    }
}

/// Author and subject of a row in `reviews`.
#[derive(Debug, Clone, FromRow)]
pub struct ReviewRow {
    pub student_id: DbId,
    pub landlord_id: DbId,
}

impl From<ReviewRow> for ReviewParties {
    fn from(row: ReviewRow) -> Self {
        Self {
            student_id: row.student_id,
            landlord_id: row.landlord_id,
        }
    }
}
