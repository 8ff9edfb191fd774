use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::gamification::policy::{policy_for, LevelPolicy, LEVELS};
use crate::models::PublicUser;
use crate::response::json_error;
use crate::state::AppState;

#[derive(Serialize)]
struct UserResponse {
    success: bool,
    data: UserData,
}

#[derive(Serialize)]
struct UserData {
    user: PublicUser,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLevelRequest {
    level: Option<u8>,
}

#[derive(Serialize)]
struct LevelsResponse {
    success: bool,
    data: LevelsData,
}

#[derive(Serialize)]
struct LevelsData {
    levels: &'static [LevelPolicy],
}

pub async fn profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    let Some(user) = crate::store::GymStore::find_user_by_id(state.store(), &auth_user.id) else {
        return json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found").into_response();
    };

    Json(UserResponse {
        success: true,
        data: UserData {
            user: user.to_public(),
        },
    })
    .into_response()
}

pub async fn update_level(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<UpdateLevelRequest>,
) -> Response {
    let Some(level) = payload.level.filter(|level| policy_for(*level).is_some()) else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "level must be 1, 2 or 3",
        )
        .into_response();
    };

    match state.store().set_user_level(&auth_user.id, level) {
        Ok(user) => {
            tracing::info!(user_id = %user.id, level, "user level updated");
            Json(UserResponse {
                success: true,
                data: UserData {
                    user: user.to_public(),
                },
            })
            .into_response()
        }
        Err(err) => {
            tracing::debug!(error = %err, "level update failed");
            json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found").into_response()
        }
    }
}

pub async fn levels() -> Response {
    Json(LevelsResponse {
        success: true,
        data: LevelsData { levels: &LEVELS },
    })
    .into_response()
}
