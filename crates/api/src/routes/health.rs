//! Health check endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub users: usize,
    pub tweets: usize,
    pub follows: usize,
}

/// GET /health — liveness plus the size of the read view.
pub async fn check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let counts = state.queries.counts().await;
    Json(HealthResponse {
        status: "ok",
        users: counts.users,
        tweets: counts.tweets,
        follows: counts.follows,
    })
}
