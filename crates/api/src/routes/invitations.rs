//! Invitation routes.
//!
//! A member's invitation codes are issued lazily: listing them tops the
//! set up to the membership's entitlement first.

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::info;

use domain::models::invitation::ListInvitationsResponse;
use domain::services::guard;
use persistence::repositories::{CircleRepository, InvitationRepository, MembershipRepository};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// List (and lazily issue) a member's invitation codes for a circle.
///
/// GET /api/v1/circles/:slug/members/:username/invitations
///
/// Only the member themselves may see their codes.
pub async fn list_member_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((slug, username)): Path<(String, String)>,
) -> Result<Json<ListInvitationsResponse>, ApiError> {
    let circle_repo = CircleRepository::new(state.pool.clone());
    let membership_repo = MembershipRepository::new(state.pool.clone());
    let invitation_repo = InvitationRepository::new(state.pool.clone());

    let circle = circle_repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    let membership = membership_repo
        .find_by_username(&username, circle.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Member not found in this circle".to_string()))?;

    if !guard::is_self_member(user_auth.user_id, membership.user_id) {
        return Err(ApiError::Forbidden(
            "Members can only list their own invitations".to_string(),
        ));
    }

    let invitations = invitation_repo
        .list_or_issue(membership.user_id, circle.id)
        .await?
        .ok_or_else(|| {
            ApiError::Forbidden("Membership is not active in this circle".to_string())
        })?;

    info!(
        slug = %slug,
        username = %username,
        count = invitations.len(),
        "Listed member invitations"
    );

    Ok(Json(ListInvitationsResponse {
        invitations: invitations.into_iter().map(|i| i.code).collect(),
    }))
}
