//! Route definitions for the per-user practice surface.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::practice;
use crate::state::AppState;

/// Routes mounted at `/users/{user_id}/practice`.
///
/// ```text
/// DELETE /             -> reset_progress
/// POST   /attempts     -> record_attempt
/// GET    /review       -> words_to_review
/// GET    /difficult    -> difficult_words
/// GET    /stats        -> stats
/// GET    /notes        -> list_notes
/// PUT    /notes        -> put_note
/// GET    /favorites    -> list_favorites
/// POST   /favorites    -> toggle_favorite
/// GET    /badges       -> list_badges
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", delete(practice::reset_progress))
        .route("/attempts", post(practice::record_attempt))
        .route("/review", get(practice::words_to_review))
        .route("/difficult", get(practice::difficult_words))
        .route("/stats", get(practice::stats))
        .route(
            "/notes",
            get(practice::list_notes).put(practice::put_note),
        )
        .route(
            "/favorites",
            get(practice::list_favorites).post(practice::toggle_favorite),
        )
        .route("/badges", get(practice::list_badges))
}
