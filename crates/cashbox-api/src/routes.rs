use axum::{
    Json, Router,
    routing::{get, post},
};

use cashbox_types::api::StatusResponse;

use crate::auth::{self, AppState};
use crate::counts;

/// API routes only. CORS, tracing and static files are layered on by the
/// server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/submit_counts", post(counts::submit_counts))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok("ok"))
}
