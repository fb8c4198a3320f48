//! Circle entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use domain::models::circle::CircleResponse;

/// Database row mapping for the circles table.
#[derive(Debug, Clone, FromRow)]
pub struct CircleEntity {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub about: Option<String>,
    pub is_public: bool,
    pub is_verified: bool,
    pub is_limited: bool,
    pub rides_offered: i32,
    pub rides_taken: i32,
    pub members_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CircleEntity> for CircleResponse {
    fn from(circle: CircleEntity) -> Self {
        CircleResponse {
            id: circle.id,
            name: circle.name,
            slug: circle.slug,
            about: circle.about,
            is_public: circle.is_public,
            is_verified: circle.is_verified,
            is_limited: circle.is_limited,
            rides_offered: circle.rides_offered,
            rides_taken: circle.rides_taken,
            members_count: circle.members_count,
            created_at: circle.created_at,
        }
    }
}
