use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{require_user_auth, trace_id};
use crate::routes::{circles, health, invitations, rides, users};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Protected routes (require JWT user authentication)
    let protected_routes = Router::new()
        // User profile (v1)
        .route("/api/v1/users/me", get(users::me).patch(users::update_me))
        // Circle routes (v1)
        .route(
            "/api/v1/circles",
            post(circles::create_circle).get(circles::list_circles),
        )
        .route(
            "/api/v1/circles/:slug",
            get(circles::get_circle)
                .patch(circles::update_circle)
                .delete(circles::delete_circle),
        )
        // Invitation routes (v1)
        .route(
            "/api/v1/circles/:slug/members/:username/invitations",
            get(invitations::list_member_invitations),
        )
        // Ride routes (v1)
        .route(
            "/api/v1/circles/:slug/rides",
            post(rides::create_ride).get(rides::list_rides),
        )
        .route("/api/v1/circles/:slug/rides/:ride_id", get(rides::get_ride))
        .route(
            "/api/v1/circles/:slug/rides/:ride_id/join",
            post(rides::join_ride),
        )
        .route(
            "/api/v1/circles/:slug/rides/:ride_id/finish",
            post(rides::finish_ride),
        )
        .route(
            "/api/v1/circles/:slug/rides/:ride_id/rate",
            post(rides::rate_ride),
        )
        // Auth runs first (outermost layer = runs first)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_user_auth,
        ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1/users/signup", post(users::signup))
        .route("/api/v1/users/login", post(users::login))
        .route("/api/v1/users/verify", post(users::verify))
        .route("/api/v1/users/token/refresh", post(users::refresh_token))
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    // Merge all routes
    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id)) // Request ID and logging
        .layer(cors)
        .with_state(state)
}
