//! Shared primitive types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// All entity and user identifiers are UUIDs, regardless of backend.
///
/// The remote store assigns them server-side (`gen_random_uuid()`); the local
/// store generates v7 UUIDs on create.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Composite identity of one learnable token instance: a word slot inside a
/// specific archival document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordKey {
    pub doc_id: DbId,
    pub word_id: i32,
}

impl WordKey {
    pub fn new(doc_id: DbId, word_id: i32) -> Self {
        Self { doc_id, word_id }
    }
}

impl fmt::Display for WordKey {
    /// Renders as `"{doc_id}-{word_id}"`, the key form used for favorites
    /// and note storage.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.doc_id, self.word_id)
    }
}
