//! Remote (PostgreSQL) repository implementations.
//!
//! Row shapes (snake_case columns, JSONB word lists, one row per attempt)
//! live in [`rows`] and are normalized to the canonical models at the query
//! boundary.

mod document_repo;
mod progress_repo;
mod report_repo;
pub mod rows;
mod user_repo;

pub use document_repo::RemoteDocumentRepo;
pub use progress_repo::RemoteProgressRepo;
pub use report_repo::RemoteReportRepo;
pub use user_repo::RemoteUserRepo;
