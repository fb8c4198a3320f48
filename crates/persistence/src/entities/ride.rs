//! Ride entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the rides table.
#[derive(Debug, Clone, FromRow)]
pub struct RideEntity {
    pub id: Uuid,
    pub circle_id: Uuid,
    pub offered_by: Option<Uuid>,
    pub departure_location: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_location: String,
    pub arrival_date: DateTime<Utc>,
    pub available_seats: i32,
    pub comments: Option<String>,
    pub is_active: bool,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A ride passenger joined with user info for responses.
#[derive(Debug, Clone, FromRow)]
pub struct PassengerEntity {
    pub user_id: Uuid,
    pub username: String,
}
