use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::gamification::policy::policy_for;
use crate::models::{PublicUser, User};
use crate::response::json_error;
use crate::state::AppState;
use crate::store::StoreError;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    level: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct RegisterResponse {
    success: bool,
    data: RegisterData,
}

#[derive(Serialize)]
struct RegisterData {
    user: PublicUser,
}

#[derive(Serialize)]
struct LoginResponse {
    success: bool,
    data: LoginData,
}

#[derive(Serialize)]
struct LoginData {
    user: PublicUser,
    token: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Response {
    let (Some(name), Some(email), Some(password), Some(level)) = (
        payload.name,
        payload.email,
        payload.password,
        payload.level,
    ) else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "name, email, password and level are required",
        )
        .into_response();
    };

    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return json_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", "invalid email")
            .into_response();
    }

    if name.trim().is_empty() || password.is_empty() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "name and password must not be empty",
        )
        .into_response();
    }

    if policy_for(level).is_none() {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "level must be 1, 2 or 3",
        )
        .into_response();
    }

    let password_hash = match bcrypt::hash(&password, 10) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::warn!(error = %err, "password hash failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal server error",
            )
            .into_response();
        }
    };

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email,
        password_hash,
        level,
        points: 0,
        consecutive_weeks: 0,
        medals: Vec::new(),
        last_visit: Some(chrono::Utc::now()),
    };
    let public = user.to_public();

    match state.store().insert_user(user) {
        Ok(()) => {
            tracing::info!(user_id = %public.id, level = public.level, "user registered");
            (
                StatusCode::CREATED,
                Json(RegisterResponse {
                    success: true,
                    data: RegisterData { user: public },
                }),
            )
                .into_response()
        }
        Err(StoreError::EmailTaken) => {
            json_error(StatusCode::CONFLICT, "CONFLICT", "email already registered")
                .into_response()
        }
        Err(err) => {
            tracing::warn!(error = %err, "user insert failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal server error",
            )
            .into_response()
        }
    }
}

pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Response {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return json_error(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            "email and password are required",
        )
        .into_response();
    };

    let Some(user) = state.store().find_user_by_email(email.trim()) else {
        return json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "invalid credentials")
            .into_response();
    };

    let password_ok = bcrypt::verify(&password, &user.password_hash).unwrap_or(false);
    if !password_ok {
        return json_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", "invalid credentials")
            .into_response();
    }

    let token = match crate::auth::sign_jwt_for_user(&user.id) {
        Ok(token) => token,
        Err(err) => {
            tracing::warn!(error = %err, "jwt sign failed");
            return json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "internal server error",
            )
            .into_response();
        }
    };

    Json(LoginResponse {
        success: true,
        data: LoginData {
            user: user.to_public(),
            token,
        },
    })
    .into_response()
}

fn is_valid_email(value: &str) -> bool {
    if value.is_empty() || value.contains(' ') {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("maria@example.com"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("maria"));
        assert!(!is_valid_email("maria@"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("maria@example"));
        assert!(!is_valid_email("ma ria@example.com"));
    }
}
