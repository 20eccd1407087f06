//! Handlers for user account CRUD and the leaderboard.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use defter_core::types::DbId;
use defter_db::models::{NewUser, UserPatch};
use serde::Deserialize;
use validator::Validate;

use super::{empty_on_store_failure, required};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a user account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 1, max = 100))]
    pub display_name: String,
    #[serde(default)]
    pub role: defter_db::models::Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: Option<i64>,
}

/// Default and maximum number of leaderboard rows.
const LEADERBOARD_DEFAULT_LIMIT: i64 = 10;
const LEADERBOARD_MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let users = empty_on_store_failure(state.storage.users.list().await, "users");
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let user = required(state.storage.users.get(id).await?, "user", id)?;
    Ok(Json(DataResponse { data: user }))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let user = state
        .storage
        .users
        .create(NewUser {
            username: input.username,
            display_name: input.display_name,
            role: input.role,
        })
        .await?;

    tracing::info!(id = %user.id, username = %user.username, "User created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<UserPatch>,
) -> AppResult<impl IntoResponse> {
    let user = state.storage.users.update(id, patch).await?;
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// Removes the account and all of its learning state.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.storage.progress.clear(id).await?;
    state.storage.users.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/leaderboard
///
/// Top accounts by XP, descending. `limit` defaults to 10, capped at 100.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query
        .limit
        .unwrap_or(LEADERBOARD_DEFAULT_LIMIT)
        .clamp(1, LEADERBOARD_MAX_LIMIT);
    let users = empty_on_store_failure(
        state.storage.users.leaderboard(limit).await,
        "leaderboard",
    );
    Ok(Json(DataResponse { data: users }))
}
