use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::gamification::{evaluate_week, GamificationError, WeeklyDecision};
use crate::models::{CheckIn, PublicUser, Validation};
use crate::response::json_error;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Serialize)]
struct CheckInResponse {
    success: bool,
    data: CheckInData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckInData {
    check_in: CheckIn,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerValidationRequest {
    trainer_validated: Option<bool>,
}

#[derive(Serialize)]
struct ValidationResponse {
    success: bool,
    data: ValidationData,
}

#[derive(Serialize)]
struct ValidationData {
    validation: Validation,
}

#[derive(Serialize)]
struct WeekResponse {
    success: bool,
    data: WeekData,
}

#[derive(Serialize)]
struct WeekData {
    decision: WeeklyDecision,
    /// Present only when the decision was persisted (current-week calls).
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<PublicUser>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryEntry {
    id: String,
    check_in_time: DateTime<Utc>,
    check_out_time: Option<DateTime<Utc>>,
    duration_minutes: i64,
    trainer_validated: bool,
}

#[derive(Serialize)]
struct HistoryResponse {
    success: bool,
    data: HistoryData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryData {
    check_ins: Vec<HistoryEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PointsHistoryEntry {
    week_start: DateTime<Utc>,
    week_end: DateTime<Utc>,
    valid_check_ins_count: i64,
    points: i64,
    reason: String,
}

#[derive(Serialize)]
struct PointsHistoryResponse {
    success: bool,
    data: PointsHistoryData,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PointsHistoryData {
    user: PublicUser,
    points_history: Vec<PointsHistoryEntry>,
}

pub async fn check_in(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    match state.store().create_check_in(&auth_user.id, Utc::now()) {
        Ok(check_in) => {
            tracing::info!(user_id = %auth_user.id, check_in_id = %check_in.id, "check-in registered");
            (
                StatusCode::CREATED,
                Json(CheckInResponse {
                    success: true,
                    data: CheckInData { check_in },
                }),
            )
                .into_response()
        }
        Err(_) => {
            json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found").into_response()
        }
    }
}

pub async fn check_out(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(check_in_id): Path<String>,
) -> Response {
    match state
        .store()
        .close_check_in(&auth_user.id, &check_in_id, Utc::now())
    {
        Ok(check_in) => {
            tracing::info!(
                user_id = %auth_user.id,
                check_in_id = %check_in.id,
                duration_minutes = check_in.duration_minutes,
                "check-out registered"
            );
            Json(CheckInResponse {
                success: true,
                data: CheckInData { check_in },
            })
            .into_response()
        }
        Err(StoreError::AlreadyCheckedOut) => json_error(
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            "checkout already registered for this check-in",
        )
        .into_response(),
        Err(_) => json_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "check-in not found or not owned by user",
        )
        .into_response(),
    }
}

pub async fn trainer_validation(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(check_in_id): Path<String>,
    Json(payload): Json<TrainerValidationRequest>,
) -> Response {
    let Some(trainer_validated) = payload.trainer_validated else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "trainerValidated field is required",
        )
        .into_response();
    };

    match state.store().upsert_validation(
        &auth_user.id,
        &check_in_id,
        trainer_validated,
        Utc::now(),
    ) {
        Ok((validation, created)) => {
            tracing::info!(
                user_id = %auth_user.id,
                check_in_id = %check_in_id,
                trainer_validated,
                created,
                "trainer validation recorded"
            );
            let status = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            (
                status,
                Json(ValidationResponse {
                    success: true,
                    data: ValidationData { validation },
                }),
            )
                .into_response()
        }
        Err(_) => json_error(
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "check-in not found or not owned by user",
        )
        .into_response(),
    }
}

/// Evaluates the current week and persists the outcome onto the user:
/// net point change, new streak value and any newly earned medal.
pub async fn validate_current_week(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    let decision = match evaluate_week(state.store(), &auth_user.id, 0, Utc::now()) {
        Ok(decision) => decision,
        Err(err) => return decision_error(err),
    };

    let user = match state.store().apply_week_decision(&auth_user.id, &decision) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!(error = %err, "decision apply failed");
            return json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found")
                .into_response();
        }
    };

    tracing::info!(
        user_id = %auth_user.id,
        net_points = decision.net_points_change,
        consecutive_weeks = decision.consecutive_weeks,
        medal = ?decision.medal_earned,
        "week validated"
    );

    Json(WeekResponse {
        success: true,
        data: WeekData {
            decision,
            user: Some(user.to_public()),
        },
    })
    .into_response()
}

/// Read-only simulation of any week window. Never mutates stored state, and
/// the engine applies no absence decay for non-zero offsets.
pub async fn validate_week_at_offset(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(week_offset): Path<String>,
) -> Response {
    let Ok(week_offset) = week_offset.parse::<i64>() else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "invalid week offset",
        )
        .into_response();
    };

    match evaluate_week(state.store(), &auth_user.id, week_offset, Utc::now()) {
        Ok(decision) => Json(WeekResponse {
            success: true,
            data: WeekData {
                decision,
                user: None,
            },
        })
        .into_response(),
        Err(err) => decision_error(err),
    }
}

pub async fn history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    let check_ins = state.store().check_ins_for_user(&auth_user.id);
    let validations = state.store().validations_for_user(&auth_user.id);

    let validation_by_check_in: HashMap<&str, &Validation> = validations
        .iter()
        .map(|validation| (validation.check_in_id.as_str(), validation))
        .collect();

    let mut entries: Vec<HistoryEntry> = check_ins
        .iter()
        .map(|check_in| HistoryEntry {
            id: check_in.id.clone(),
            check_in_time: check_in.check_in_time,
            check_out_time: check_in.check_out_time,
            duration_minutes: check_in.duration_minutes,
            trainer_validated: validation_by_check_in
                .get(check_in.id.as_str())
                .map(|validation| validation.trainer_validated)
                .unwrap_or(false),
        })
        .collect();

    entries.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time));

    Json(HistoryResponse {
        success: true,
        data: HistoryData { check_ins: entries },
    })
    .into_response()
}

/// Per-week earnings for the trailing five windows, derived by running the
/// scoring engine as a read-only simulation over each window.
pub async fn points_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    let Some(user) = crate::store::GymStore::find_user_by_id(state.store(), &auth_user.id) else {
        return json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found").into_response();
    };

    let now = Utc::now();
    let mut points_history = Vec::new();
    for week_offset in (-4..=0).rev() {
        let decision = match evaluate_week(state.store(), &auth_user.id, week_offset, now) {
            Ok(decision) => decision,
            Err(err) => return decision_error(err),
        };
        points_history.push(PointsHistoryEntry {
            week_start: decision.week_start,
            week_end: decision.week_end,
            valid_check_ins_count: decision.valid_check_ins_count,
            points: decision.points_earned,
            reason: frequency_reason(decision.valid_check_ins_count),
        });
    }

    Json(PointsHistoryResponse {
        success: true,
        data: PointsHistoryData {
            user: user.to_public(),
            points_history,
        },
    })
    .into_response()
}

fn frequency_reason(valid_check_ins: i64) -> String {
    if valid_check_ins >= 7 {
        "Weekly frequency (7x)".to_string()
    } else if valid_check_ins >= 5 {
        "Weekly frequency (5x)".to_string()
    } else if valid_check_ins >= 3 {
        "Weekly frequency (3x)".to_string()
    } else {
        "Weekly minimum not met".to_string()
    }
}

fn decision_error(err: GamificationError) -> Response {
    match err {
        GamificationError::UserNotFound => {
            json_error(StatusCode::NOT_FOUND, "NOT_FOUND", "user not found").into_response()
        }
        GamificationError::UnknownLevel(level) => {
            tracing::error!(level, "user has no level policy");
            crate::response::AppError::internal("no level policy for user").into_response()
        }
    }
}
