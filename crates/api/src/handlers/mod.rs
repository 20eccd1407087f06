//! HTTP handler functions, grouped by entity.
//!
//! Route definitions live in [`crate::routes`]; the functions here hold the
//! actual request/response logic and their request DTOs.

pub mod documents;
pub mod practice;
pub mod reports;
pub mod users;

use crate::error::AppError;
use defter_db::StoreResult;

/// Degrade a collection read to an empty result on backend failure.
///
/// List endpoints stay usable when the store is briefly unreachable; the
/// failure is logged and the client sees an empty collection instead of a
/// 500. Write paths never use this.
fn empty_on_store_failure<T>(result: StoreResult<Vec<T>>, what: &'static str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(error = %err, what, "Read degraded to empty result");
            Vec::new()
        }
    }
}

/// `Ok(Some(v))` -> `Ok(v)`, `Ok(None)` -> 404.
fn required<T>(
    found: Option<T>,
    entity: &'static str,
    id: defter_core::types::DbId,
) -> Result<T, AppError> {
    found.ok_or_else(|| AppError::Store(defter_db::StoreError::not_found(entity, id)))
}
