pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::pipeline::{handlers as generate, ARTIFACTS_ROUTE};
use crate::profile::handlers as profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let artifacts = ServeDir::new(state.pipeline.artifacts_dir());

    Router::new()
        .route("/health", get(health::health_handler))
        // Profile API
        .route(
            "/api/v1/profile",
            get(profile::handle_get_profile).post(profile::handle_save_profile),
        )
        .route(
            "/api/v1/profile/history",
            get(profile::handle_profile_history),
        )
        // Generation API
        .route("/api/v1/generate", post(generate::handle_generate))
        .nest_service(ARTIFACTS_ROUTE, artifacts)
        .with_state(state)
}
