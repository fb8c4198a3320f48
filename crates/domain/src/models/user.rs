//! User domain models.
//!
//! Request/response DTOs for signup, login, verification and profile
//! updates. Users are created unverified and become verified through a
//! time-bounded confirmation token.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use shared::validation::{validate_phone_number, validate_username};

/// Request to sign up a new user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct SignUpRequest {
    #[validate(email(message = "Invalid email address"))]
    #[validate(length(max = 255, message = "Email must be at most 255 characters"))]
    pub email: String,

    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,

    /// Must match `password`; checked at the schema level.
    pub password_confirmation: String,

    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,

    /// Optional contact phone in +999999999 format.
    #[serde(default)]
    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: String,
}

impl SignUpRequest {
    /// Checks the password confirmation matches. Kept out of `validate()`
    /// so the error can name both fields.
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_confirmation
    }
}

/// Public representation of a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserResponse {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub reputation: f64,
    pub is_verified: bool,
}

/// Request to log in.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

/// Response after a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_expires_at: DateTime<Utc>,
}

/// Request to verify an account with the e-mailed token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct VerifyAccountRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

/// Request to refresh an access token.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct RefreshTokenRequest {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Response carrying a fresh access token.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub token_expires_at: DateTime<Utc>,
}

/// Request to update the authenticated user's profile.
#[derive(Debug, Clone, Deserialize, Validate, Default)]
#[serde(rename_all = "snake_case")]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100, message = "First name cannot be empty"))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,

    #[validate(custom(function = "validate_phone_number"))]
    pub phone_number: Option<String>,
}

/// Compact user reference embedded in other responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup_request() -> SignUpRequest {
        SignUpRequest {
            email: "eaudiotre@gmail.com".to_string(),
            username: "ezioaud".to_string(),
            password: "admin123!".to_string(),
            password_confirmation: "admin123!".to_string(),
            first_name: "Ezio".to_string(),
            last_name: "Auditore".to_string(),
            phone_number: "+525512345678".to_string(),
        }
    }

    #[test]
    fn test_signup_request_valid() {
        let request = signup_request();
        assert!(request.validate().is_ok());
        assert!(request.passwords_match());
    }

    #[test]
    fn test_signup_request_invalid_email() {
        let mut request = signup_request();
        request.email = "not-an-email".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_invalid_username() {
        let mut request = signup_request();
        request.username = "e!".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_short_password() {
        let mut request = signup_request();
        request.password = "short".to_string();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_signup_request_password_mismatch() {
        let mut request = signup_request();
        request.password_confirmation = "different123".to_string();
        // Field-level validation still passes; the mismatch is a schema check.
        assert!(request.validate().is_ok());
        assert!(!request.passwords_match());
    }

    #[test]
    fn test_signup_request_empty_phone_allowed() {
        let mut request = signup_request();
        request.phone_number = String::new();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_profile_empty_names_rejected() {
        let request = UpdateProfileRequest {
            first_name: Some(String::new()),
            ..Default::default()
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_update_profile_all_none_valid() {
        assert!(UpdateProfileRequest::default().validate().is_ok());
    }
}
