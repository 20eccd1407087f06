pub mod documents;
pub mod health;
pub mod practice;
pub mod reports;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /documents                                   list, create
/// /documents/{id}                              get, update, delete
///
/// /users                                       list, create
/// /users/{id}                                  get, update, delete
/// /leaderboard                                 top accounts by XP
///
/// /users/{user_id}/practice                    reset (DELETE)
/// /users/{user_id}/practice/attempts           record attempt (POST)
/// /users/{user_id}/practice/review             words due for review
/// /users/{user_id}/practice/difficult          hardest words
/// /users/{user_id}/practice/stats              progress snapshot
/// /users/{user_id}/practice/notes              list, upsert
/// /users/{user_id}/practice/favorites          list, toggle
/// /users/{user_id}/practice/badges             unlocked badges
///
/// /reports                                     list, create
/// /reports/{id}                                get, delete
/// /reports/{id}/status                         transition (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/documents", documents::router())
        .merge(users::router())
        // Same `{id}` name as the account routes; matchit rejects two param
        // names in the same segment position.
        .nest("/users/{id}/practice", practice::router())
        .nest("/reports", reports::router())
}
