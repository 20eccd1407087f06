//! Handlers for the per-user practice surface: attempts, review queue,
//! difficult words, stats, notes, favorites, badges.
//!
//! Every route carries the owning user id in the path; there is no ambient
//! current-user state.

use std::collections::BTreeSet;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use defter_core::badges::BadgeDef;
use defter_core::engine::AttemptInput;
use defter_core::types::{DbId, Timestamp, WordKey};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::practice::PracticeService;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response DTOs
// ---------------------------------------------------------------------------

/// Catalog definition plus unlock timestamp, serialized for clients.
#[derive(Debug, Serialize)]
pub struct BadgeView {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<Timestamp>,
}

impl BadgeView {
    fn new(def: &'static BadgeDef, unlocked_at: Option<Timestamp>) -> Self {
        Self {
            id: def.id,
            name: def.name,
            icon: def.icon,
            description: def.description,
            unlocked_at,
        }
    }
}

/// Response for a recorded attempt: the scheduled log entry, the updated
/// profile, and any badges unlocked by it.
#[derive(Debug, Serialize)]
pub struct AttemptResponse {
    pub attempt: defter_core::engine::WordAttempt,
    pub profile: defter_core::profile::UserProfile,
    pub new_badges: Vec<BadgeView>,
}

/// DTO addressing one word within one document.
#[derive(Debug, Deserialize)]
pub struct WordRef {
    pub doc_id: DbId,
    pub word_id: i32,
}

impl WordRef {
    fn key(&self) -> WordKey {
        WordKey::new(self.doc_id, self.word_id)
    }
}

/// DTO for writing a note on a word.
#[derive(Debug, Deserialize)]
pub struct PutNoteRequest {
    pub doc_id: DbId,
    pub word_id: i32,
    pub text: String,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// POST /api/v1/users/{user_id}/practice/attempts
pub async fn record_attempt(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<AttemptInput>,
) -> AppResult<impl IntoResponse> {
    let recorded = PracticeService::new(&state.storage)
        .record(user_id, input)
        .await?;

    let response = AttemptResponse {
        attempt: recorded.attempt,
        profile: recorded.profile,
        new_badges: recorded
            .new_badges
            .into_iter()
            .map(|def| BadgeView::new(def, None))
            .collect(),
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: response })))
}

/// GET /api/v1/users/{user_id}/practice/review
///
/// Words due for review now, most overdue first.
pub async fn words_to_review(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let due = PracticeService::new(&state.storage)
        .words_to_review(user_id)
        .await?;
    Ok(Json(DataResponse { data: due }))
}

/// GET /api/v1/users/{user_id}/practice/difficult
pub async fn difficult_words(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let hard = PracticeService::new(&state.storage)
        .difficult_words(user_id)
        .await?;
    Ok(Json(DataResponse { data: hard }))
}

/// GET /api/v1/users/{user_id}/practice/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let stats = PracticeService::new(&state.storage).stats(user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/users/{user_id}/practice/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let notes = PracticeService::new(&state.storage).notes(user_id).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// PUT /api/v1/users/{user_id}/practice/notes
///
/// Upsert: a second note for the same word replaces the first.
pub async fn put_note(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<PutNoteRequest>,
) -> AppResult<impl IntoResponse> {
    let key = WordKey::new(input.doc_id, input.word_id);
    let note = PracticeService::new(&state.storage)
        .put_note(user_id, key, &input.text)
        .await?;
    Ok(Json(DataResponse { data: note }))
}

/// GET /api/v1/users/{user_id}/practice/favorites
///
/// Favorite word keys in `"{doc_id}-{word_id}"` form.
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let favorites: BTreeSet<String> = PracticeService::new(&state.storage)
        .favorites(user_id)
        .await?;
    Ok(Json(DataResponse { data: favorites }))
}

/// POST /api/v1/users/{user_id}/practice/favorites
///
/// Toggle; the response reports whether the word is a favorite afterwards.
pub async fn toggle_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
    Json(input): Json<WordRef>,
) -> AppResult<impl IntoResponse> {
    let is_favorite = PracticeService::new(&state.storage)
        .toggle_favorite(user_id, input.key())
        .await?;
    Ok(Json(DataResponse {
        data: serde_json::json!({ "is_favorite": is_favorite }),
    }))
}

/// GET /api/v1/users/{user_id}/practice/badges
pub async fn list_badges(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let unlocked = PracticeService::new(&state.storage)
        .unlocked_badges(user_id)
        .await?;
    let badges: Vec<BadgeView> = unlocked
        .into_iter()
        .map(|(def, at)| BadgeView::new(def, Some(at)))
        .collect();
    Ok(Json(DataResponse { data: badges }))
}

/// DELETE /api/v1/users/{user_id}/practice
///
/// Drop all learning state for the user (attempts, profile, notes,
/// favorites, badges).
pub async fn reset_progress(
    State(state): State<AppState>,
    Path(user_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    PracticeService::new(&state.storage).reset(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
