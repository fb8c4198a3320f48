//! Circle domain models.
//!
//! A circle is a named, admission-gated community. Its slug is assigned
//! at creation and never changes; aggregate counters (members, rides
//! offered/taken) drive the public listing order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::pagination::{PageInfo, PageQuery};
use shared::validation::validate_slug;

/// Request to create a new circle.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateCircleRequest {
    #[validate(length(min = 1, max = 140, message = "Name must be 1-140 characters"))]
    pub name: String,

    /// Unique, immutable identifier used in URLs.
    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 500, message = "About must be at most 500 characters"))]
    pub about: Option<String>,

    /// Whether the circle appears in the public listing (default: true).
    pub is_public: Option<bool>,

    /// Whether membership is capped (default: false).
    pub is_limited: Option<bool>,
}

/// Request to update an existing circle. Admin only; the slug and the
/// verified flag are not updatable through this surface.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateCircleRequest {
    #[validate(length(min = 1, max = 140, message = "Name must be 1-140 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 500, message = "About must be at most 500 characters"))]
    pub about: Option<String>,

    pub is_public: Option<bool>,

    pub is_limited: Option<bool>,
}

/// Public representation of a circle.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CircleResponse {
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
}

/// Query parameters for the public circle listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListCirclesQuery {
    #[serde(flatten)]
    pub page: PageQuery,
}

/// Response for the public circle listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCirclesResponse {
    pub circles: Vec<CircleResponse>,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_circle_request_valid() {
        let request = CreateCircleRequest {
            name: "Facultad de Ciencias".to_string(),
            slug: "fciencias".to_string(),
            about: Some("Grupo oficial de la Facultad de Ciencias de la UNAM".to_string()),
            is_public: Some(true),
            is_limited: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_create_circle_request_bad_slug() {
        let request = CreateCircleRequest {
            name: "Facultad de Ciencias".to_string(),
            slug: "FCiencias UNAM".to_string(),
            about: None,
            is_public: None,
            is_limited: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_circle_request_empty_name() {
        let request = CreateCircleRequest {
            name: String::new(),
            slug: "fciencias".to_string(),
            about: None,
            is_public: None,
            is_limited: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_circle_request_all_none_valid() {
        assert!(UpdateCircleRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_circle_request_long_about() {
        let request = UpdateCircleRequest {
            about: Some("x".repeat(501)),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }
}
