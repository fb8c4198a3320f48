//! Circle routes: creation, public listing, retrieval and updates.
//!
//! Circles can never be deleted; the DELETE handler exists only to
//! answer 405 instead of axum's default 404.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use domain::models::circle::{
    CircleResponse, CreateCircleRequest, ListCirclesQuery, ListCirclesResponse,
    UpdateCircleRequest,
};
use domain::services::guard;
use persistence::repositories::{CircleRepository, MembershipRepository};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Create a new circle. The creator becomes its founding admin member.
///
/// POST /api/v1/circles
pub async fn create_circle(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateCircleRequest>,
) -> Result<(StatusCode, Json<CircleResponse>), ApiError> {
    request.validate()?;

    let circle_repo = CircleRepository::new(state.pool.clone());
    let circle = circle_repo
        .create_with_founder(
            &request.name,
            &request.slug,
            request.about.as_deref(),
            request.is_public.unwrap_or(true),
            request.is_limited.unwrap_or(false),
            user_auth.user_id,
        )
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("A circle with that slug already exists".to_string())
            }
            other => other.into(),
        })?;

    info!(slug = %circle.slug, user_id = %user_auth.user_id, "Circle created");

    Ok((StatusCode::CREATED, Json(circle.into())))
}

/// List public circles, most active first.
///
/// GET /api/v1/circles
pub async fn list_circles(
    State(state): State<AppState>,
    Query(query): Query<ListCirclesQuery>,
) -> Result<Json<ListCirclesResponse>, ApiError> {
    let circle_repo = CircleRepository::new(state.pool.clone());
    let (circles, total) = circle_repo
        .list_public(query.page.per_page(), query.page.offset())
        .await?;

    Ok(Json(ListCirclesResponse {
        circles: circles.into_iter().map(Into::into).collect(),
        pagination: PageInfo::new(&query.page, total),
    }))
}

/// Retrieve a circle by slug.
///
/// GET /api/v1/circles/:slug
pub async fn get_circle(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CircleResponse>, ApiError> {
    let circle_repo = CircleRepository::new(state.pool.clone());
    let circle = circle_repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    Ok(Json(circle.into()))
}

/// Update a circle. Admin only; the slug itself is immutable.
///
/// PATCH /api/v1/circles/:slug
pub async fn update_circle(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(slug): Path<String>,
    Json(request): Json<UpdateCircleRequest>,
) -> Result<Json<CircleResponse>, ApiError> {
    request.validate()?;

    let circle_repo = CircleRepository::new(state.pool.clone());
    let membership_repo = MembershipRepository::new(state.pool.clone());

    let circle = circle_repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    let membership: Option<domain::models::membership::Membership> = membership_repo
        .find(user_auth.user_id, circle.id)
        .await?
        .map(Into::into);
    if !guard::is_circle_admin(membership.as_ref()) {
        return Err(ApiError::Forbidden(
            "Only circle admins can update a circle".to_string(),
        ));
    }

    let updated = circle_repo
        .update(
            &slug,
            request.name.as_deref(),
            request.about.as_deref(),
            request.is_public,
            request.is_limited,
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    info!(slug = %slug, user_id = %user_auth.user_id, "Circle updated");

    Ok(Json(updated.into()))
}

/// Circles cannot be deleted.
///
/// DELETE /api/v1/circles/:slug
pub async fn delete_circle(Path(_slug): Path<String>) -> ApiError {
    ApiError::MethodNotAllowed("Circles cannot be deleted".to_string())
}
