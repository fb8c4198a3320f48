//! Rating entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the ratings table.
///
/// User references are nullable (ON DELETE SET NULL); the rating itself
/// is never deleted or updated.
#[derive(Debug, Clone, FromRow)]
pub struct RatingEntity {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub circle_id: Uuid,
    pub rating_user_id: Option<Uuid>,
    pub rated_user_id: Option<Uuid>,
    pub score: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}
