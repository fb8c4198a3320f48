//! Invitation entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
///
/// `issued_by` is nullable: deleting a user nullifies the reference
/// without touching the invitation.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub circle_id: Uuid,
    pub issued_by: Option<Uuid>,
    pub code: String,
    pub created_at: DateTime<Utc>,
}
