mod auth;
mod gym;
mod health;
mod users;

use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::Router;

use crate::middleware::rate_limit::{api_rate_limit_middleware, auth_rate_limit_middleware};
use crate::response::json_error;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/users/profile", get(users::profile))
        .route("/api/users/level", put(users::update_level))
        .route("/api/users/levels", get(users::levels))
        .route("/api/gym/checkin", post(gym::check_in))
        .route("/api/gym/checkout/:checkInId", post(gym::check_out))
        .route(
            "/api/gym/trainer-validation/:checkInId",
            post(gym::trainer_validation),
        )
        .route("/api/gym/validate-week", get(gym::validate_current_week))
        .route(
            "/api/gym/validate-week/:weekOffset",
            get(gym::validate_week_at_offset),
        )
        .route("/api/gym/history", get(gym::history))
        .route("/api/gym/points-history", get(gym::points_history))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_auth,
        ));

    Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .merge(protected)
        .nest("/health", health::router())
        .layer(middleware::from_fn(auth_rate_limit_middleware))
        .layer(middleware::from_fn(api_rate_limit_middleware))
        .fallback(fallback_handler)
        .with_state(state)
}

async fn fallback_handler() -> Response {
    json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "route not found").into_response()
}
