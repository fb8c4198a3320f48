//! Ride domain models and lifecycle constants.
//!
//! A ride moves Open -> (passengers join while seats remain) -> Finished.
//! Finished is terminal: it is reached by explicit owner action or by the
//! scheduled sweep, and no transition leaves it.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::pagination::{PageInfo, PageQuery};

use super::user::UserInfo;

/// Minutes of lead time a ride must keep before departure to appear in
/// the joinable listing (and to be created at all).
pub const RIDE_JOIN_GRACE_MINUTES: i64 = 10;

/// Width, in minutes, of the recent-arrival window the sweep job scans
/// for rides that ended without an explicit finish.
pub const RIDE_SWEEP_WINDOW_MINUTES: i64 = 20;

/// Request to offer a new ride in a circle.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateRideRequest {
    #[validate(range(min = 1, message = "A ride must offer at least one seat"))]
    pub available_seats: i32,

    #[validate(length(min = 1, max = 255, message = "Departure location is required"))]
    pub departure_location: String,

    pub departure_date: DateTime<Utc>,

    #[validate(length(min = 1, max = 255, message = "Arrival location is required"))]
    pub arrival_location: String,

    pub arrival_date: DateTime<Utc>,

    #[validate(length(max = 500, message = "Comments must be at most 500 characters"))]
    pub comments: Option<String>,
}

impl CreateRideRequest {
    /// Time-dependent schedule checks, kept out of `validate()` so tests
    /// and callers can pin `now`.
    pub fn validate_schedule(&self, now: DateTime<Utc>) -> Result<(), String> {
        if self.departure_date >= self.arrival_date {
            return Err("Departure must happen before arrival".to_string());
        }
        if self.departure_date < now + Duration::minutes(RIDE_JOIN_GRACE_MINUTES) {
            return Err(format!(
                "Departure must be at least {} minutes in the future",
                RIDE_JOIN_GRACE_MINUTES
            ));
        }
        Ok(())
    }
}

/// Public representation of a ride.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RideResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offered_by: Option<UserInfo>,
    pub departure_location: String,
    pub departure_date: DateTime<Utc>,
    pub arrival_location: String,
    pub arrival_date: DateTime<Utc>,
    pub available_seats: i32,
    pub passengers: Vec<UserInfo>,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

/// Query parameters for the joinable ride listing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct ListRidesQuery {
    /// Case-insensitive text filter on departure/arrival location.
    pub search: Option<String>,

    #[serde(flatten)]
    pub page: PageQuery,
}

/// Response for the joinable ride listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListRidesResponse {
    pub rides: Vec<RideResponse>,
    pub pagination: PageInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ride_request(now: DateTime<Utc>) -> CreateRideRequest {
        CreateRideRequest {
            available_seats: 3,
            departure_location: "Facultad de Ciencias".to_string(),
            departure_date: now + Duration::hours(1),
            arrival_location: "Perisur".to_string(),
            arrival_date: now + Duration::hours(2),
            comments: None,
        }
    }

    #[test]
    fn test_create_ride_request_valid() {
        let now = Utc::now();
        let request = ride_request(now);
        assert!(request.validate().is_ok());
        assert!(request.validate_schedule(now).is_ok());
    }

    #[test]
    fn test_create_ride_zero_seats_rejected() {
        let mut request = ride_request(Utc::now());
        request.available_seats = 0;
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_ride_departure_after_arrival() {
        let now = Utc::now();
        let mut request = ride_request(now);
        request.arrival_date = request.departure_date - Duration::minutes(30);
        assert!(request.validate_schedule(now).is_err());
    }

    #[test]
    fn test_create_ride_departure_equals_arrival() {
        let now = Utc::now();
        let mut request = ride_request(now);
        request.arrival_date = request.departure_date;
        assert!(request.validate_schedule(now).is_err());
    }

    #[test]
    fn test_create_ride_inside_grace_window() {
        let now = Utc::now();
        let mut request = ride_request(now);
        request.departure_date = now + Duration::minutes(RIDE_JOIN_GRACE_MINUTES - 1);
        assert!(request.validate_schedule(now).is_err());
    }

    #[test]
    fn test_create_ride_exactly_at_grace_window() {
        let now = Utc::now();
        let mut request = ride_request(now);
        request.departure_date = now + Duration::minutes(RIDE_JOIN_GRACE_MINUTES);
        request.arrival_date = request.departure_date + Duration::hours(1);
        assert!(request.validate_schedule(now).is_ok());
    }

    #[test]
    fn test_empty_departure_location_rejected() {
        let mut request = ride_request(Utc::now());
        request.departure_location = String::new();
        assert!(request.validate().is_err());
    }
}
