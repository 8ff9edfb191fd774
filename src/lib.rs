pub mod auth;
pub mod config;
pub mod gamification;
pub mod logging;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;
pub mod seed;
pub mod state;
pub mod store;

use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::state::AppState;
use crate::store::MemoryStore;

pub fn create_app() -> axum::Router {
    let config = Config::from_env();

    let store = Arc::new(MemoryStore::new());
    if config.seed_demo_data {
        seed::seed_demo_data(&store);
    }

    let state = AppState::new(config, store);

    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
