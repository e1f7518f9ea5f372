//! Query endpoints over the read view.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use read_view::{Follow, Tweet, User};
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

/// A user as exposed over HTTP. The stored password never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.into(),
            username: user.username,
        }
    }
}

/// GET /users/{id}
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.queries.get_user_by_id(&id).await?;
    Ok(Json(user.into()))
}

/// GET /users/by-username/{username}
pub async fn get_by_username(
    State(state): State<Arc<AppState>>,
    Path(username): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.queries.get_user_by_username(&username).await?;
    Ok(Json(user.into()))
}

/// GET /users/{id}/tweets
pub async fn tweets(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    Ok(Json(state.queries.get_tweets(&id).await?))
}

/// GET /users/{id}/timeline — grouped by followee, not sorted by time.
pub async fn timeline(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Tweet>>, ApiError> {
    Ok(Json(state.queries.get_timeline(&id).await?))
}

/// GET /users/{id}/followers
pub async fn followers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Follow>>, ApiError> {
    Ok(Json(state.queries.get_followers(&id).await?))
}

/// GET /users/{id}/followees
pub async fn followees(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Follow>>, ApiError> {
    Ok(Json(state.queries.get_followees(&id).await?))
}
