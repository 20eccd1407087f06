//! Canonical entity models.
//!
//! These are the backend-agnostic shapes every repository returns, regardless
//! of whether rows came from PostgreSQL or the local JSON store. Backend-
//! specific shapes live in `remote::rows` and `local::records`.

pub mod document;
pub mod error_report;
pub mod progress;
pub mod user;

pub use document::{ArchivalDocument, Difficulty, DocumentFilter, DocumentPatch, NewDocument, WordCoords, WordToken};
pub use error_report::{ErrorReport, NewReport, ReportStatus};
pub use progress::WordNote;
pub use user::{NewUser, Role, UserAccount, UserPatch};
