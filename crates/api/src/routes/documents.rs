//! Route definitions for archival document CRUD.

use axum::routing::get;
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// GET    /         -> list_documents (filterable)
/// POST   /         -> create_document
/// GET    /{id}     -> get_document
/// PUT    /{id}     -> update_document
/// DELETE /{id}     -> delete_document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(documents::list_documents).post(documents::create_document),
        )
        .route(
            "/{id}",
            get(documents::get_document)
                .put(documents::update_document)
                .delete(documents::delete_document),
        )
}
