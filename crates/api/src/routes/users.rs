//! User routes: signup, login, account verification, token refresh and
//! profile updates.

use axum::{extract::State, http::StatusCode, Json};
use chrono::{Duration, Utc};
use serde::Serialize;
use tracing::info;
use validator::Validate;

use domain::models::user::{
    LoginRequest, LoginResponse, RefreshTokenRequest, RefreshTokenResponse, SignUpRequest,
    UpdateProfileRequest, UserResponse, VerifyAccountRequest,
};
use persistence::repositories::UserRepository;
use shared::jwt::extract_user_id;
use shared::password::{hash_password, verify_password};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::user_auth::UserAuth as UserAuthData;
use crate::services::email::EmailService;

/// Response after a successful signup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SignUpResponse {
    pub user: UserResponse,
}

/// Response after account verification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct VerifyAccountResponse {
    pub message: String,
}

/// Sign up a new user.
///
/// POST /api/v1/users/signup
///
/// The account starts unverified; a confirmation token is emailed and
/// must be posted to the verify endpoint before logging in.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    request.validate()?;
    if !request.passwords_match() {
        return Err(ApiError::Validation("Passwords don't match".to_string()));
    }

    let password_hash = hash_password(&request.password)?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .create_user(
            &request.email,
            &request.username,
            &password_hash,
            &request.first_name,
            &request.last_name,
            &request.phone_number,
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("A user with that email or username already exists".to_string())
            }
            other => other.into(),
        })?;

    let jwt_config = UserAuthData::create_jwt_config(&state.config.jwt);
    let token = jwt_config.generate_verification_token(&user.username)?;

    let email_service = EmailService::new(state.config.email.clone());
    if let Err(e) = email_service
        .send_verification_email(&user.email, &user.username, &token)
        .await
    {
        // Signup already succeeded; the token can be re-requested later
        tracing::warn!(username = %user.username, error = %e, "Failed to send verification email");
    }

    info!(username = %user.username, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse { user: user.into() }),
    ))
}

/// Log in with email and password.
///
/// POST /api/v1/users/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_email(&request.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = verify_password(&request.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    if !user.is_verified {
        return Err(ApiError::Forbidden(
            "Account is not verified yet".to_string(),
        ));
    }

    let jwt_config = UserAuthData::create_jwt_config(&state.config.jwt);
    let (access_token, _) = jwt_config.generate_access_token(user.id)?;
    let (refresh_token, _) = jwt_config.generate_refresh_token(user.id)?;
    let token_expires_at = Utc::now() + Duration::seconds(state.config.jwt.access_token_expiry_secs);

    info!(username = %user.username, "User logged in");

    Ok(Json(LoginResponse {
        user: user.into(),
        access_token,
        refresh_token,
        token_expires_at,
    }))
}

/// Verify an account with the emailed confirmation token.
///
/// POST /api/v1/users/verify
pub async fn verify(
    State(state): State<AppState>,
    Json(request): Json<VerifyAccountRequest>,
) -> Result<Json<VerifyAccountResponse>, ApiError> {
    request.validate()?;

    let jwt_config = UserAuthData::create_jwt_config(&state.config.jwt);
    let username = jwt_config.validate_verification_token(&request.token)?;

    let user_repo = UserRepository::new(state.pool.clone());
    let updated = user_repo.mark_verified(&username).await?;
    if updated == 0 {
        return match user_repo.find_by_username(&username).await? {
            Some(_) => Err(ApiError::Conflict(
                "Account is already verified".to_string(),
            )),
            None => Err(ApiError::NotFound("User not found".to_string())),
        };
    }

    info!(username = %username, "Account verified");

    Ok(Json(VerifyAccountResponse {
        message: "Congratulations, now go share some rides!".to_string(),
    }))
}

/// Exchange a refresh token for a fresh access token.
///
/// POST /api/v1/users/token/refresh
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshTokenRequest>,
) -> Result<Json<RefreshTokenResponse>, ApiError> {
    request.validate()?;

    let jwt_config = UserAuthData::create_jwt_config(&state.config.jwt);
    let claims = jwt_config.validate_refresh_token(&request.refresh_token)?;
    let user_id = extract_user_id(&claims)?;

    let (access_token, _) = jwt_config.generate_access_token(user_id)?;
    let token_expires_at = Utc::now() + Duration::seconds(state.config.jwt.access_token_expiry_secs);

    Ok(Json(RefreshTokenResponse {
        access_token,
        token_expires_at,
    }))
}

/// Update the authenticated user's profile.
///
/// PATCH /api/v1/users/me
pub async fn update_me(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    request.validate()?;

    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .update_profile(
            user_auth.user_id,
            request.first_name.as_deref(),
            request.last_name.as_deref(),
            request.phone_number.as_deref(),
        )
        .await?;

    Ok(Json(user.into()))
}

/// Fetch the authenticated user's profile.
///
/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<UserResponse>, ApiError> {
    let user_repo = UserRepository::new(state.pool.clone());
    let user = user_repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}
