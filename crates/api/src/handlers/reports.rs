//! Handlers for crowd-sourced correction reports.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use defter_core::types::DbId;
use defter_db::models::{NewReport, ReportStatus};
use serde::Deserialize;

use super::{empty_on_store_failure, required};
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    pub status: Option<ReportStatus>,
}

#[derive(Debug, Deserialize)]
pub struct SetStatusRequest {
    pub status: ReportStatus,
}

// ---------------------------------------------------------------------------
// Endpoints
// ---------------------------------------------------------------------------

/// GET /api/v1/reports
///
/// List reports, newest first, optionally filtered by `status`.
pub async fn list_reports(
    State(state): State<AppState>,
    Query(query): Query<ReportListQuery>,
) -> AppResult<impl IntoResponse> {
    let reports =
        empty_on_store_failure(state.storage.reports.list(query.status).await, "reports");
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/reports/{id}
pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let report = required(state.storage.reports.get(id).await?, "report", id)?;
    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/reports
pub async fn create_report(
    State(state): State<AppState>,
    Json(input): Json<NewReport>,
) -> AppResult<impl IntoResponse> {
    let report = state.storage.reports.create(input).await?;
    tracing::info!(id = %report.id, doc_id = %report.doc_id, word_id = report.word_id, "Report filed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: report })))
}

/// PUT /api/v1/reports/{id}/status
///
/// Apply a status transition. Invalid transitions (terminal states are
/// final) come back as 400.
pub async fn set_report_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let report = state
        .storage
        .reports
        .set_status(id, input.status, chrono::Utc::now())
        .await?;
    Ok(Json(DataResponse { data: report }))
}

/// DELETE /api/v1/reports/{id}
pub async fn delete_report(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.storage.reports.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
