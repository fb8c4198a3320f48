//! Membership entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::membership::Membership;

/// Database row mapping for the memberships table.
#[derive(Debug, Clone, FromRow)]
pub struct MembershipEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub circle_id: Uuid,
    pub is_active: bool,
    pub is_admin: bool,
    pub remaining_invitations: i32,
    pub rides_offered: i32,
    pub rides_taken: i32,
    pub invited_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipEntity> for Membership {
    fn from(entity: MembershipEntity) -> Self {
        Membership {
            id: entity.id,
            user_id: entity.user_id,
            circle_id: entity.circle_id,
            is_active: entity.is_active,
            is_admin: entity.is_admin,
            remaining_invitations: entity.remaining_invitations,
            rides_offered: entity.rides_offered,
            rides_taken: entity.rides_taken,
            joined_at: entity.created_at,
        }
    }
}
