//! Local learning-state repository.
//!
//! Each user's state lives under its own key prefix; the attempt log is
//! persisted as a whole on every mutation, which keeps the stored shape a
//! faithful append-only sequence.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use defter_core::engine::WordAttempt;
use defter_core::profile::UserProfile;
use defter_core::types::{DbId, Timestamp, WordKey};

use crate::error::StoreResult;
use crate::kv::{KeyValueStore, KeyValueStoreExt};
use crate::models::WordNote;
use crate::repositories::ProgressRepository;

use super::progress_key;
use super::records::{from_millis, parse_id, to_millis, StoredAttempt, StoredNote, StoredProfile};

pub struct LocalProgressRepo {
    store: Arc<dyn KeyValueStore>,
}

impl LocalProgressRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn attempts_key(user_id: DbId) -> String {
        progress_key(user_id, "attempts")
    }

    fn load_attempts(&self, user_id: DbId) -> Vec<WordAttempt> {
        self.store
            .get_or::<Vec<StoredAttempt>>(&Self::attempts_key(user_id), Vec::new())
            .into_iter()
            .map(Into::into)
            .collect()
    }
}

#[async_trait]
impl ProgressRepository for LocalProgressRepo {
    async fn attempts(&self, user_id: DbId) -> StoreResult<Vec<WordAttempt>> {
        Ok(self.load_attempts(user_id))
    }

    async fn push_attempt(
        &self,
        user_id: DbId,
        attempt: &WordAttempt,
        profile: &UserProfile,
    ) -> StoreResult<()> {
        let mut records =
            self.store
                .get_or::<Vec<StoredAttempt>>(&Self::attempts_key(user_id), Vec::new());
        records.push(attempt.into());
        self.store.set(&Self::attempts_key(user_id), &records)?;
        self.save_profile(user_id, profile).await
    }

    async fn profile(&self, user_id: DbId) -> StoreResult<Option<UserProfile>> {
        Ok(self
            .store
            .get::<StoredProfile>(&progress_key(user_id, "profile"))
            .map(Into::into))
    }

    async fn save_profile(&self, user_id: DbId, profile: &UserProfile) -> StoreResult<()> {
        self.store
            .set(&progress_key(user_id, "profile"), &StoredProfile::from(profile))
    }

    async fn notes(&self, user_id: DbId) -> StoreResult<Vec<WordNote>> {
        let stored = self
            .store
            .get_or::<BTreeMap<String, StoredNote>>(&progress_key(user_id, "notes"), BTreeMap::new());
        Ok(stored
            .into_iter()
            .filter_map(|(key, note)| {
                // Keys are "{doc_id}-{word_id}"; the uuid itself contains
                // hyphens, so split from the right.
                let (doc, word) = key.rsplit_once('-')?;
                Some(WordNote {
                    doc_id: parse_id(doc),
                    word_id: word.parse().ok()?,
                    text: note.text,
                    updated_at: from_millis(note.updated_at),
                })
            })
            .collect())
    }

    async fn put_note(
        &self,
        user_id: DbId,
        key: WordKey,
        text: &str,
        at: Timestamp,
    ) -> StoreResult<WordNote> {
        let notes_key = progress_key(user_id, "notes");
        let mut stored = self
            .store
            .get_or::<BTreeMap<String, StoredNote>>(&notes_key, BTreeMap::new());
        stored.insert(
            key.to_string(),
            StoredNote {
                text: text.to_string(),
                updated_at: to_millis(at),
            },
        );
        self.store.set(&notes_key, &stored)?;
        Ok(WordNote {
            doc_id: key.doc_id,
            word_id: key.word_id,
            text: text.to_string(),
            updated_at: at,
        })
    }

    async fn favorites(&self, user_id: DbId) -> StoreResult<BTreeSet<String>> {
        Ok(self
            .store
            .get_or::<BTreeSet<String>>(&progress_key(user_id, "favorites"), BTreeSet::new()))
    }

    async fn toggle_favorite(&self, user_id: DbId, key: WordKey) -> StoreResult<bool> {
        let favorites_key = progress_key(user_id, "favorites");
        let mut favorites = self
            .store
            .get_or::<BTreeSet<String>>(&favorites_key, BTreeSet::new());
        let entry = key.to_string();
        let now_member = if favorites.contains(&entry) {
            favorites.remove(&entry);
            false
        } else {
            favorites.insert(entry);
            true
        };
        self.store.set(&favorites_key, &favorites)?;
        Ok(now_member)
    }

    async fn unlocked_badges(&self, user_id: DbId) -> StoreResult<BTreeMap<String, Timestamp>> {
        let stored = self
            .store
            .get_or::<BTreeMap<String, i64>>(&progress_key(user_id, "badges"), BTreeMap::new());
        Ok(stored
            .into_iter()
            .map(|(id, ms)| (id, from_millis(ms)))
            .collect())
    }

    async fn unlock_badges(&self, user_id: DbId, ids: &[&str], at: Timestamp) -> StoreResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let badges_key = progress_key(user_id, "badges");
        let mut stored = self
            .store
            .get_or::<BTreeMap<String, i64>>(&badges_key, BTreeMap::new());
        for id in ids {
            // Existing unlocks keep their original timestamp.
            stored.entry((*id).to_string()).or_insert_with(|| to_millis(at));
        }
        self.store.set(&badges_key, &stored)
    }

    async fn clear(&self, user_id: DbId) -> StoreResult<()> {
        for key in self.store.keys(&progress_key(user_id, "")) {
            self.store.remove(&key)?;
        }
        Ok(())
    }
}
