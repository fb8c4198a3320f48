//! Ride routes: offer, list, retrieve, join, finish and rate rides
//! within a circle.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use domain::models::rating::{CreateRatingRequest, RatingResponse};
use domain::models::ride::{
    CreateRideRequest, ListRidesQuery, ListRidesResponse, RideResponse,
};
use domain::models::user::UserInfo;
use domain::services::guard;
use persistence::entities::{CircleEntity, RideEntity};
use persistence::repositories::{
    CircleRepository, JoinRideOutcome, MembershipRepository, RatingRepository, RatingWrite,
    RideRepository, UserRepository,
};
use shared::pagination::PageInfo;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Resolve the circle and require an active membership for the caller.
async fn active_member_circle(
    state: &AppState,
    user_id: Uuid,
    slug: &str,
) -> Result<CircleEntity, ApiError> {
    let circle = CircleRepository::new(state.pool.clone())
        .find_by_slug(slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Circle not found".to_string()))?;

    let membership: Option<domain::models::membership::Membership> =
        MembershipRepository::new(state.pool.clone())
            .find(user_id, circle.id)
            .await?
            .map(Into::into);
    if !guard::is_active_member(membership.as_ref()) {
        return Err(ApiError::Forbidden(
            "You are not an active member of this circle".to_string(),
        ));
    }

    Ok(circle)
}

/// Assemble the public ride view, resolving the offerer and passenger
/// usernames.
async fn build_ride_response(
    state: &AppState,
    ride: RideEntity,
) -> Result<RideResponse, ApiError> {
    let ride_repo = RideRepository::new(state.pool.clone());
    let user_repo = UserRepository::new(state.pool.clone());

    let offered_by = match ride.offered_by {
        Some(user_id) => user_repo.find_by_id(user_id).await?.map(|user| UserInfo {
            id: user.id,
            username: user.username,
        }),
        None => None,
    };

    let passengers = ride_repo
        .passengers(ride.id)
        .await?
        .into_iter()
        .map(|p| UserInfo {
            id: p.user_id,
            username: p.username,
        })
        .collect();

    Ok(RideResponse {
        id: ride.id,
        offered_by,
        departure_location: ride.departure_location,
        departure_date: ride.departure_date,
        arrival_location: ride.arrival_location,
        arrival_date: ride.arrival_date,
        available_seats: ride.available_seats,
        passengers,
        is_active: ride.is_active,
        comments: ride.comments,
        finished_at: ride.finished_at,
    })
}

/// Offer a new ride in a circle.
///
/// POST /api/v1/circles/:slug/rides
pub async fn create_ride(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(slug): Path<String>,
    Json(request): Json<CreateRideRequest>,
) -> Result<(StatusCode, Json<RideResponse>), ApiError> {
    request.validate()?;
    request
        .validate_schedule(Utc::now())
        .map_err(ApiError::Validation)?;

    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let ride = RideRepository::new(state.pool.clone())
        .create(
            circle.id,
            user_auth.user_id,
            &request.departure_location,
            request.departure_date,
            &request.arrival_location,
            request.arrival_date,
            request.available_seats,
            request.comments.as_deref(),
        )
        .await?;

    info!(slug = %slug, ride_id = %ride.id, user_id = %user_auth.user_id, "Ride created");

    let response = build_ride_response(&state, ride).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// List joinable rides in a circle.
///
/// GET /api/v1/circles/:slug/rides
pub async fn list_rides(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(slug): Path<String>,
    Query(query): Query<ListRidesQuery>,
) -> Result<Json<ListRidesResponse>, ApiError> {
    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let (rides, total) = RideRepository::new(state.pool.clone())
        .list_joinable(
            circle.id,
            Utc::now(),
            query.search.as_deref(),
            query.page.per_page(),
            query.page.offset(),
        )
        .await?;

    let mut responses = Vec::with_capacity(rides.len());
    for ride in rides {
        responses.push(build_ride_response(&state, ride).await?);
    }

    Ok(Json(ListRidesResponse {
        rides: responses,
        pagination: PageInfo::new(&query.page, total),
    }))
}

/// Retrieve a single ride, finished or not.
///
/// GET /api/v1/circles/:slug/rides/:ride_id
pub async fn get_ride(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((slug, ride_id)): Path<(String, Uuid)>,
) -> Result<Json<RideResponse>, ApiError> {
    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let ride = RideRepository::new(state.pool.clone())
        .find_by_id(circle.id, ride_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    let response = build_ride_response(&state, ride).await?;
    Ok(Json(response))
}

/// Join a ride as a passenger, taking one seat.
///
/// POST /api/v1/circles/:slug/rides/:ride_id/join
pub async fn join_ride(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((slug, ride_id)): Path<(String, Uuid)>,
) -> Result<Json<RideResponse>, ApiError> {
    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let ride_repo = RideRepository::new(state.pool.clone());
    let ride = ride_repo
        .find_by_id(circle.id, ride_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    if !guard::is_not_ride_owner(user_auth.user_id, ride.offered_by) {
        return Err(ApiError::Forbidden(
            "The ride owner cannot join as a passenger".to_string(),
        ));
    }

    let outcome = ride_repo
        .join(circle.id, ride_id, user_auth.user_id, Utc::now())
        .await?;

    let ride = match outcome {
        JoinRideOutcome::Joined(ride) => ride,
        JoinRideOutcome::Full => {
            return Err(ApiError::Conflict("No seats available".to_string()));
        }
        JoinRideOutcome::AlreadyPassenger => {
            return Err(ApiError::Conflict(
                "You are already a passenger of this ride".to_string(),
            ));
        }
        JoinRideOutcome::Finished => {
            return Err(ApiError::Conflict(
                "This ride is already finished".to_string(),
            ));
        }
        JoinRideOutcome::Departed => {
            return Err(ApiError::Validation(
                "You can't join this ride now".to_string(),
            ));
        }
        JoinRideOutcome::NotFound => {
            return Err(ApiError::NotFound("Ride not found".to_string()));
        }
    };

    info!(slug = %slug, ride_id = %ride_id, user_id = %user_auth.user_id, "Passenger joined ride");

    let response = build_ride_response(&state, ride).await?;
    Ok(Json(response))
}

/// Finish an active ride. Owner only; finished rides stay finished.
///
/// POST /api/v1/circles/:slug/rides/:ride_id/finish
pub async fn finish_ride(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((slug, ride_id)): Path<(String, Uuid)>,
) -> Result<Json<RideResponse>, ApiError> {
    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let ride_repo = RideRepository::new(state.pool.clone());
    let ride = ride_repo
        .find_by_id(circle.id, ride_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    if !guard::is_ride_owner(user_auth.user_id, ride.offered_by) {
        return Err(ApiError::Forbidden(
            "Only the ride owner can finish a ride".to_string(),
        ));
    }

    let finished = ride_repo
        .finish(circle.id, ride_id, Utc::now())
        .await?
        .ok_or_else(|| ApiError::Conflict("Ride is already finished".to_string()))?;

    info!(slug = %slug, ride_id = %ride_id, "Ride finished");

    let response = build_ride_response(&state, finished).await?;
    Ok(Json(response))
}

/// Rate a fellow participant after the ride finished.
///
/// POST /api/v1/circles/:slug/rides/:ride_id/rate
///
/// Ratings flow both directions: offerer rates passenger or passenger
/// rates offerer. Each direction once per ride.
pub async fn rate_ride(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((slug, ride_id)): Path<(String, Uuid)>,
    Json(request): Json<CreateRatingRequest>,
) -> Result<(StatusCode, Json<RatingResponse>), ApiError> {
    request.validate()?;

    let circle = active_member_circle(&state, user_auth.user_id, &slug).await?;

    let ride_repo = RideRepository::new(state.pool.clone());
    let user_repo = UserRepository::new(state.pool.clone());
    let rating_repo = RatingRepository::new(state.pool.clone());

    let ride = ride_repo
        .find_by_id(circle.id, ride_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Ride not found".to_string()))?;

    if ride.is_active {
        return Err(ApiError::Validation(
            "Ride is not finished yet".to_string(),
        ));
    }

    let rated_user = user_repo
        .find_by_username(&request.rated_user)
        .await?
        .ok_or_else(|| ApiError::NotFound("Rated user not found".to_string()))?;

    if rated_user.id == user_auth.user_id {
        return Err(ApiError::Validation(
            "You cannot rate yourself".to_string(),
        ));
    }

    // Exactly one side of the rating must be the offerer, the other a
    // passenger of this ride.
    let rater_is_offerer = guard::is_ride_owner(user_auth.user_id, ride.offered_by);
    let rated_is_offerer = guard::is_ride_owner(rated_user.id, ride.offered_by);
    let passenger_side = if rater_is_offerer {
        rated_user.id
    } else if rated_is_offerer {
        user_auth.user_id
    } else {
        return Err(ApiError::Validation(
            "One of the rated pair must be the ride offerer".to_string(),
        ));
    };

    if !ride_repo.is_participant(ride.id, passenger_side).await? {
        return Err(ApiError::Validation(
            "Both users must have taken part in this ride".to_string(),
        ));
    }

    if rating_repo
        .exists(ride.id, user_auth.user_id, rated_user.id)
        .await?
    {
        return Err(ApiError::Conflict(
            "You already rated this user for this ride".to_string(),
        ));
    }

    let rating = rating_repo
        .create(RatingWrite {
            ride_id: ride.id,
            circle_id: circle.id,
            rating_user_id: user_auth.user_id,
            rated_user_id: rated_user.id,
            score: request.score,
            comment: request.comment.clone(),
        })
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.code().as_deref() == Some("23505") => {
                ApiError::Conflict("You already rated this user for this ride".to_string())
            }
            other => other.into(),
        })?;

    let rating_user = user_repo
        .find_by_id(user_auth.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    info!(
        slug = %slug,
        ride_id = %ride_id,
        rated = %rated_user.username,
        score = request.score,
        "Rating recorded"
    );

    Ok((
        StatusCode::CREATED,
        Json(RatingResponse {
            id: rating.id,
            ride_id: rating.ride_id,
            rating_user: rating_user.username,
            rated_user: rated_user.username,
            score: rating.score,
            comment: rating.comment,
            created_at: rating.created_at,
        }),
    ))
}
