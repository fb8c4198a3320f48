//! Common validation utilities shared by domain DTOs.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    /// Usernames: 3-30 chars, letters, digits, underscores and dots.
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z0-9_.]{3,30}$").unwrap();

    /// Circle slugs: 3-40 chars, lowercase letters, digits and hyphens.
    pub static ref SLUG_REGEX: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]{2,39}$").unwrap();

    /// Phone numbers in E.164-ish shape: optional +, up to 16 digits.
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?1?\d{9,15}$").unwrap();
}

/// Validates a username against the shared policy.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username) {
        Ok(())
    } else {
        let mut err = ValidationError::new("username_format");
        err.message =
            Some("Username must be 3-30 characters: letters, digits, '.' or '_'".into());
        Err(err)
    }
}

/// Validates a circle slug.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message =
            Some("Slug must be 3-40 lowercase characters: letters, digits or '-'".into());
        Err(err)
    }
}

/// Validates a phone number.
pub fn validate_phone_number(phone: &str) -> Result<(), ValidationError> {
    if phone.is_empty() || PHONE_REGEX.is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must be in the format +999999999 (9-15 digits)".into());
        Err(err)
    }
}

/// Validates that a departure timestamp lies ahead of an arrival one.
pub fn validate_time_window(
    departure: DateTime<Utc>,
    arrival: DateTime<Utc>,
) -> Result<(), ValidationError> {
    if departure < arrival {
        Ok(())
    } else {
        let mut err = ValidationError::new("time_window");
        err.message = Some("Departure must happen before arrival".into());
        Err(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_username_accepts_common_forms() {
        assert!(validate_username("ezioaud").is_ok());
        assert!(validate_username("ezio.auditore_77").is_ok());
    }

    #[test]
    fn test_validate_username_rejects_bad_forms() {
        assert!(validate_username("ab").is_err()); // too short
        assert!(validate_username("has space").is_err());
        assert!(validate_username("way-too-long-for-a-username-field-here").is_err());
        assert!(validate_username("ñandú").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("fciencias").is_ok());
        assert!(validate_slug("f-ciencias-unam").is_ok());
        assert!(validate_slug("FCiencias").is_err());
        assert!(validate_slug("-leading").is_err());
        assert!(validate_slug("ab").is_err());
    }

    #[test]
    fn test_validate_phone_number() {
        assert!(validate_phone_number("+525512345678").is_ok());
        assert!(validate_phone_number("5512345678").is_ok());
        assert!(validate_phone_number("").is_ok()); // optional field
        assert!(validate_phone_number("not-a-phone").is_err());
        assert!(validate_phone_number("+12").is_err());
    }

    #[test]
    fn test_validate_time_window() {
        let now = Utc::now();
        assert!(validate_time_window(now, now + Duration::hours(1)).is_ok());
        assert!(validate_time_window(now + Duration::hours(1), now).is_err());
        assert!(validate_time_window(now, now).is_err());
    }
}
