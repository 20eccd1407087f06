//! Handlers for archival document CRUD.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use defter_core::types::DbId;
use defter_db::models::{DocumentFilter, DocumentPatch, NewDocument};
use validator::Validate;

use super::{empty_on_store_failure, required};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a document. Validated before it reaches the store.
#[derive(Debug, serde::Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 100))]
    pub category: String,
    pub difficulty: defter_db::models::Difficulty,
    #[validate(range(min = 1300, max = 2000))]
    pub year: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub words: Vec<defter_db::models::WordToken>,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/documents
///
/// List documents, optionally filtered by `category`, `difficulty`, `year`.
pub async fn list_documents(
    State(state): State<AppState>,
    Query(filter): Query<DocumentFilter>,
) -> AppResult<impl IntoResponse> {
    let documents =
        empty_on_store_failure(state.storage.documents.list(&filter).await, "documents");
    Ok(Json(DataResponse { data: documents }))
}

/// GET /api/v1/documents/{id}
pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = required(state.storage.documents.get(id).await?, "document", id)?;
    Ok(Json(DataResponse { data: document }))
}

/// POST /api/v1/documents
pub async fn create_document(
    State(state): State<AppState>,
    Json(input): Json<CreateDocumentRequest>,
) -> AppResult<impl IntoResponse> {
    input
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let document = state
        .storage
        .documents
        .create(NewDocument {
            title: input.title,
            category: input.category,
            difficulty: input.difficulty,
            year: input.year,
            image_url: input.image_url,
            words: input.words,
        })
        .await?;

    tracing::info!(id = %document.id, title = %document.title, "Document created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: document })))
}

/// PUT /api/v1/documents/{id}
///
/// Partial update; absent fields are left untouched.
pub async fn update_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(patch): Json<DocumentPatch>,
) -> AppResult<impl IntoResponse> {
    let document = state.storage.documents.update(id, patch).await?;
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/documents/{id}
///
/// Idempotent: deleting an unknown id succeeds.
pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.storage.documents.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
