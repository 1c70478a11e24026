pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::ai::handlers as ai;
use crate::jobs::handlers as jobs;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/jobs",
            post(jobs::handle_create_job).get(jobs::handle_list_jobs),
        )
        .route(
            "/jobs/:id",
            put(jobs::handle_update_job).delete(jobs::handle_delete_job),
        )
        .route("/analyze-resume", post(ai::handle_analyze_resume))
        .route("/mock-interview", post(ai::handle_mock_interview))
        .with_state(state)
}
