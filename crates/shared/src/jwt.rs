//! JWT token utilities using HS256 signing.
//!
//! Two token families are issued from the same signing secret:
//! - session tokens (access/refresh pairs) bound to a user id, and
//! - single-purpose account-verification tokens bound to a username,
//!   carrying a `type` claim of `email_confirmation`.
//!
//! Session tokens carry no circle or membership claims. Authorization is
//! always resolved against the membership table at request time.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,
}

/// Session token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID (unique token identifier)
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Type of session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Claims for the account-verification token sent by e-mail.
///
/// The claim shape is fixed: `{user: username, exp, type}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationClaims {
    /// Username of the account being verified.
    pub user: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Purpose marker, must equal [`VERIFICATION_TOKEN_TYPE`].
    #[serde(rename = "type")]
    pub token_type: String,
}

/// Required `type` claim on verification tokens.
pub const VERIFICATION_TOKEN_TYPE: &str = "email_confirmation";

/// Verification tokens expire three days after signup.
pub const VERIFICATION_TOKEN_EXPIRY_DAYS: i64 = 3;

/// Default leeway in seconds for clock skew tolerance.
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Configuration for JWT token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    /// Access token expiration in seconds (default: 3600 = 1 hour)
    pub access_token_expiry_secs: i64,
    /// Refresh token expiration in seconds (default: 2592000 = 30 days)
    pub refresh_token_expiry_secs: i64,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("keys", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a new JwtConfig from a shared HS256 secret.
    pub fn from_secret(
        secret: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        }
    }

    /// Generates an access token for the given user ID.
    ///
    /// Returns the encoded token and its jti.
    pub fn generate_access_token(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.generate_session_token(user_id, TokenType::Access, self.access_token_expiry_secs)
    }

    /// Generates a refresh token for the given user ID.
    pub fn generate_refresh_token(&self, user_id: Uuid) -> Result<(String, String), JwtError> {
        self.generate_session_token(user_id, TokenType::Refresh, self.refresh_token_expiry_secs)
    }

    fn generate_session_token(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a session token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_decode_error)?;

        Ok(token_data.claims)
    }

    /// Validates an access token specifically.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Validates a refresh token specifically.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Refresh {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    /// Generates an account-verification token for the given username.
    ///
    /// Expires [`VERIFICATION_TOKEN_EXPIRY_DAYS`] days after issuance.
    pub fn generate_verification_token(&self, username: &str) -> Result<String, JwtError> {
        let exp = (Utc::now() + Duration::days(VERIFICATION_TOKEN_EXPIRY_DAYS)).timestamp();

        let claims = VerificationClaims {
            user: username.to_string(),
            exp,
            token_type: VERIFICATION_TOKEN_TYPE.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates a verification token and returns the username it was
    /// issued for.
    ///
    /// Checks signature, expiry and the `type` claim.
    pub fn validate_verification_token(&self, token: &str) -> Result<String, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<VerificationClaims>(token, &self.decoding_key, &validation)
            .map_err(map_decode_error)?;

        if token_data.claims.token_type != VERIFICATION_TOKEN_TYPE {
            return Err(JwtError::InvalidToken);
        }

        Ok(token_data.claims.user)
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken
        | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
        _ => JwtError::DecodingError(e.to_string()),
    }
}

/// Extracts the user ID from validated session claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> JwtConfig {
        JwtConfig::from_secret("test_secret_key_for_jwt_testing_12345", 900, 604800, 0)
    }

    #[test]
    fn test_generate_access_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id).unwrap();

        assert!(!token.is_empty());
        assert!(!jti.is_empty());
        assert!(token.contains('.'), "JWT should have dots separating parts");
    }

    #[test]
    fn test_validate_access_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id).unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_validate_refresh_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, _) = config.generate_refresh_token(user_id).unwrap();
        let claims = config.validate_refresh_token(&token).unwrap();

        assert_eq!(claims.token_type, TokenType::Refresh);
    }

    #[test]
    fn test_access_token_rejected_as_refresh() {
        let config = create_test_config();
        let (token, _) = config.generate_access_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            config.validate_refresh_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = create_test_config();
        let (token, _) = config.generate_refresh_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_invalid_token() {
        let config = create_test_config();
        let result = config.validate_token("invalid.token.here");

        assert!(matches!(
            result,
            Err(JwtError::InvalidToken) | Err(JwtError::DecodingError(_))
        ));
    }

    #[test]
    fn test_verification_token_roundtrip() {
        let config = create_test_config();

        let token = config.generate_verification_token("ezioaud").unwrap();
        let username = config.validate_verification_token(&token).unwrap();

        assert_eq!(username, "ezioaud");
    }

    #[test]
    fn test_verification_token_expires_in_three_days() {
        let config = create_test_config();

        let before = Utc::now() + Duration::days(VERIFICATION_TOKEN_EXPIRY_DAYS);
        let token = config.generate_verification_token("ezioaud").unwrap();
        let after = Utc::now() + Duration::days(VERIFICATION_TOKEN_EXPIRY_DAYS);

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data = decode::<VerificationClaims>(
            &token,
            &DecodingKey::from_secret(b"test_secret_key_for_jwt_testing_12345"),
            &validation,
        )
        .unwrap();

        assert!(data.claims.exp >= before.timestamp());
        assert!(data.claims.exp <= after.timestamp());
        assert_eq!(data.claims.token_type, VERIFICATION_TOKEN_TYPE);
    }

    #[test]
    fn test_session_token_rejected_as_verification() {
        let config = create_test_config();
        let (token, _) = config.generate_access_token(Uuid::new_v4()).unwrap();

        // A session token has no `user`/`type` claims, so decoding into
        // VerificationClaims must fail.
        assert!(config.validate_verification_token(&token).is_err());
    }

    #[test]
    fn test_verification_token_rejected_as_session() {
        let config = create_test_config();
        let token = config.generate_verification_token("ezioaud").unwrap();

        assert!(config.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_extract_user_id() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, _) = config.generate_access_token(user_id).unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_unique_jti_per_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (_, jti1) = config.generate_access_token(user_id).unwrap();
        let (_, jti2) = config.generate_access_token(user_id).unwrap();

        assert_ne!(jti1, jti2);
    }

    #[test]
    fn test_tampered_secret_rejected() {
        let config = create_test_config();
        let other = JwtConfig::from_secret("a_completely_different_secret", 900, 604800, 0);

        let (token, _) = config.generate_access_token(Uuid::new_v4()).unwrap();
        assert!(other.validate_access_token(&token).is_err());
    }
}
