//! Storage-boundary error type.
//!
//! Backend failures (network, constraint, corrupt local data) are caught at
//! this layer and logged; they never propagate as panics. Read misses are not
//! errors: `get` returns `Ok(None)` for an unknown id.

use defter_core::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write targeted an entity that does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// An input failed validation before reaching the backend.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Remote backend failure (network, timeout, constraint violation).
    #[error("Database error: {0}")]
    Backend(#[from] sqlx::Error),

    /// Local store (de)serialization failure.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Local store I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        Self::NotFound { entity, id }
    }

    /// Whether this error is a missing-entity outcome rather than a backend
    /// fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
