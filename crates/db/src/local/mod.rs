//! Local (key-value) repository implementations.
//!
//! The local store keeps whole collections under well-known keys, in the
//! legacy browser-storage shape (`records`): camelCase fields, string ids,
//! millisecond timestamps. Everything is normalized to the canonical models
//! on read and denormalized on write.

mod document_repo;
mod progress_repo;
pub mod records;
mod report_repo;
mod user_repo;

pub use document_repo::LocalDocumentRepo;
pub use progress_repo::LocalProgressRepo;
pub use report_repo::LocalReportRepo;
pub use user_repo::LocalUserRepo;

/// Key of the document collection.
pub const DOCUMENTS_KEY: &str = "defter:documents";
/// Key of the user collection.
pub const USERS_KEY: &str = "defter:users";
/// Key of the error-report collection.
pub const REPORTS_KEY: &str = "defter:error_reports";

/// Key prefix for one user's learning state.
pub fn progress_key(user_id: uuid::Uuid, section: &str) -> String {
    format!("defter:progress:{user_id}:{section}")
}
