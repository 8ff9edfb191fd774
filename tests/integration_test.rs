use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

mod common;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_health_root() {
    let app = common::create_test_app();

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_live() {
    let app = common::create_test_app();

    let response = app.oneshot(get("/health/live")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_info() {
    let app = common::create_test_app();

    let response = app.oneshot(get("/health/info")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["service"], "academia-backend");
}

#[tokio::test]
async fn test_404_not_found() {
    let app = common::create_test_app();

    let response = app.oneshot(get("/nonexistent/path")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unauthorized_without_token() {
    let app = common::create_test_app();

    let response = app.oneshot(get("/api/users/profile")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_rejects_bad_level() {
    let app = common::create_test_app();

    let response = app
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "Roberto Almeida",
                "email": "roberto@example.com",
                "password": "senha123",
                "level": 9
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let app = common::create_test_app();

    let register = post_json(
        "/api/auth/register",
        None,
        serde_json::json!({
            "name": "Mario Souza",
            "email": "mario@example.com",
            "password": "senha123",
            "level": 1
        }),
    );
    let response = app.clone().oneshot(register).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = post_json(
        "/api/auth/login",
        None,
        serde_json::json!({"email": "mario@example.com", "password": "wrong"}),
    );
    let response = app.oneshot(login).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn register_and_login(app: &Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "name": "Test User",
                "email": email,
                "password": "senha123",
                "level": 1
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/auth/login",
            None,
            serde_json::json!({"email": email, "password": "senha123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["data"]["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_check_in_checkout_validation_flow() {
    let app = common::create_test_app();
    let token = register_and_login(&app, "flow@example.com").await;

    let response = app
        .clone()
        .oneshot(post_json("/api/gym/checkin", Some(&token), serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let check_in_id = body["data"]["checkIn"]["id"].as_str().unwrap().to_string();

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/gym/checkout/{check_in_id}"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // A second checkout of the same session must be rejected.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/gym/checkout/{check_in_id}"),
            Some(&token),
            serde_json::json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/gym/trainer-validation/{check_in_id}"),
            Some(&token),
            serde_json::json!({"trainerValidated": true}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Re-validating overwrites instead of duplicating.
    let response = app
        .clone()
        .oneshot(post_json(
            &format!("/api/gym/trainer-validation/{check_in_id}"),
            Some(&token),
            serde_json::json!({"trainerValidated": false}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .clone()
        .oneshot(get_with_token("/api/gym/history", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body["data"]["checkIns"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["trainerValidated"], false);
}

#[tokio::test]
async fn test_validate_week_over_http() {
    let app = common::create_test_app();
    let token = register_and_login(&app, "week@example.com").await;

    let response = app
        .clone()
        .oneshot(get_with_token("/api/gym/validate-week", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    // Fresh account, no sessions: nothing earned, streak resets to zero.
    assert_eq!(body["data"]["decision"]["pointsEarned"], 0);
    assert_eq!(body["data"]["decision"]["consecutiveWeeks"], 0);
    assert_eq!(body["data"]["decision"]["penalties"], 0);
    assert!(body["data"]["user"].is_object());

    let response = app
        .clone()
        .oneshot(get_with_token("/api/gym/validate-week/-1", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // Simulations never carry penalties and never return a mutated user.
    assert_eq!(body["data"]["decision"]["penalties"], 0);
    assert!(body["data"]["user"].is_null());

    let response = app
        .oneshot(get_with_token("/api/gym/validate-week/abc", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_levels_listing() {
    let app = common::create_test_app();
    let token = register_and_login(&app, "levels@example.com").await;

    let response = app
        .oneshot(get_with_token("/api/users/levels", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let levels = body["data"]["levels"].as_array().unwrap();
    assert_eq!(levels.len(), 3);
    assert_eq!(levels[0]["medal"]["name"], "PRIMEIRO PASSO");
}
