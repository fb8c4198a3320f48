//! Rating domain models.
//!
//! Ratings store the score (1-5) a ride participant gave another one
//! after the ride finished, and feed the rated user's reputation
//! aggregate. A rating is immutable once created.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Lowest accepted score.
pub const MIN_SCORE: i16 = 1;

/// Highest accepted score.
pub const MAX_SCORE: i16 = 5;

/// Request to rate a participant of a finished ride.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRatingRequest {
    /// Username of the participant being rated.
    #[validate(length(min = 1, message = "Rated user is required"))]
    pub rated_user: String,

    #[validate(range(min = 1, max = 5, message = "Score must be between 1 and 5"))]
    pub score: i16,

    #[validate(length(max = 500, message = "Comment must be at most 500 characters"))]
    pub comment: Option<String>,
}

/// Public representation of a rating.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RatingResponse {
    pub id: Uuid,
    pub ride_id: Uuid,
    pub rating_user: String,
    pub rated_user: String,
    pub score: i16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating_request(score: i16) -> CreateRatingRequest {
        CreateRatingRequest {
            rated_user: "ezioaud".to_string(),
            score,
            comment: Some("Buen viaje".to_string()),
        }
    }

    #[test]
    fn test_rating_request_valid() {
        for score in MIN_SCORE..=MAX_SCORE {
            assert!(rating_request(score).validate().is_ok());
        }
    }

    #[test]
    fn test_rating_request_out_of_range() {
        assert!(rating_request(0).validate().is_err());
        assert!(rating_request(6).validate().is_err());
    }

    #[test]
    fn test_rating_request_empty_rated_user() {
        let mut request = rating_request(5);
        request.rated_user = String::new();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_rating_request_long_comment() {
        let mut request = rating_request(3);
        request.comment = Some("x".repeat(501));
        assert!(request.validate().is_err());
    }
}
