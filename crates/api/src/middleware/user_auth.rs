//! User JWT authentication middleware.
//!
//! Provides middleware for requiring JWT-based user authentication on routes.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use shared::jwt::JwtConfig;

/// Authenticated user information extracted from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for session tracking.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns user authentication info.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, String> {
        let claims = jwt_config
            .validate_access_token(token)
            .map_err(|e| format!("Invalid token: {}", e))?;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|_| "Invalid user ID in token".to_string())?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
        })
    }

    /// Creates a JwtConfig from JwtAuthConfig.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> JwtConfig {
        JwtConfig::from_secret(
            &config.secret,
            config.access_token_expiry_secs,
            config.refresh_token_expiry_secs,
            config.leeway_secs,
        )
    }
}

/// Middleware that requires JWT user authentication.
///
/// Validates the Bearer token in the Authorization header and rejects
/// requests without a valid JWT. Authenticated user information is
/// stored in request extensions for use by downstream handlers.
pub async fn require_user_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return unauthorized_response("Missing or invalid Authorization header");
        }
    };

    let jwt_config = UserAuth::create_jwt_config(&state.config.jwt);

    match UserAuth::validate(&jwt_config, token) {
        Ok(auth) => {
            req.extensions_mut().insert(auth);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!("Token validation failed: {}", e);
            unauthorized_response("Invalid or expired token")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_jwt_auth_config() -> JwtAuthConfig {
        JwtAuthConfig {
            secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            access_token_expiry_secs: 3600,
            refresh_token_expiry_secs: 2592000,
            leeway_secs: 30,
        }
    }

    #[test]
    fn test_validate_accepts_fresh_access_token() {
        let jwt_config = UserAuth::create_jwt_config(&test_jwt_auth_config());
        let user_id = Uuid::new_v4();
        let (token, jti) = jwt_config.generate_access_token(user_id).unwrap();

        let auth = UserAuth::validate(&jwt_config, &token).unwrap();
        assert_eq!(auth.user_id, user_id);
        assert_eq!(auth.jti, jti);
    }

    #[test]
    fn test_validate_rejects_refresh_token() {
        let jwt_config = UserAuth::create_jwt_config(&test_jwt_auth_config());
        let (token, _) = jwt_config.generate_refresh_token(Uuid::new_v4()).unwrap();

        assert!(UserAuth::validate(&jwt_config, &token).is_err());
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let jwt_config = UserAuth::create_jwt_config(&test_jwt_auth_config());
        assert!(UserAuth::validate(&jwt_config, "not-a-token").is_err());
    }
}
