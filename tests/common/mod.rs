use axum::Router;

pub fn create_test_app() -> Router {
    std::env::set_var("NODE_ENV", "test");
    std::env::set_var("JWT_SECRET", "integration-test-secret");

    academia_backend_rust::create_app()
}
