//! Per-user learning-state entities beyond the attempt log itself.
//!
//! The attempt log ([`defter_core::engine::WordAttempt`]) and profile
//! ([`defter_core::profile::UserProfile`]) are defined in the core crate;
//! this module adds the persisted satellites. Badge unlocks have no struct
//! of their own: they are a plain badge-id to unlock-timestamp map.

use defter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Freeform annotation on one word. At most one per (doc, word) pair;
/// writing again replaces the text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordNote {
    pub doc_id: DbId,
    pub word_id: i32,
    pub text: String,
    pub updated_at: Timestamp,
}
