//! Route definitions for correction reports.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// Routes mounted at `/reports`.
///
/// ```text
/// GET    /               -> list_reports (?status=)
/// POST   /               -> create_report
/// GET    /{id}           -> get_report
/// DELETE /{id}           -> delete_report
/// PUT    /{id}/status    -> set_report_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(reports::list_reports).post(reports::create_report))
        .route(
            "/{id}",
            get(reports::get_report).delete(reports::delete_report),
        )
        .route("/{id}/status", put(reports::set_report_status))
}
