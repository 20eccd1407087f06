//! Practice orchestration: ties the pure learning engine to persistence.
//!
//! The engine itself never touches storage; this service loads the user's
//! attempt log and profile, runs the pure derivation, and persists the
//! results. Badge evaluation happens synchronously inside the same request
//! so the response can carry the newly unlocked badges.

use std::collections::BTreeSet;

use chrono::Utc;
use defter_core::badges::{self, BadgeDef, BadgeInputs};
use defter_core::engine::{self, AttemptInput, Stats, WordAttempt};
use defter_core::profile::UserProfile;
use defter_core::types::{DbId, Timestamp, WordKey};
use defter_db::models::WordNote;
use defter_db::repositories::Storage;

use crate::error::AppResult;

/// Everything the client needs after recording one attempt.
#[derive(Debug)]
pub struct RecordedAttempt {
    pub attempt: WordAttempt,
    pub profile: UserProfile,
    pub new_badges: Vec<&'static BadgeDef>,
}

/// Stateless orchestrator over the storage facade.
pub struct PracticeService<'a> {
    storage: &'a Storage,
}

impl<'a> PracticeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// The user's profile, or a fresh one seeded from the account's display
    /// name when the user has never practiced.
    async fn profile_or_default(&self, user_id: DbId) -> AppResult<UserProfile> {
        if let Some(profile) = self.storage.progress.profile(user_id).await? {
            return Ok(profile);
        }
        let display_name = self
            .storage
            .users
            .get(user_id)
            .await?
            .map(|u| u.display_name)
            .unwrap_or_default();
        Ok(UserProfile::new(display_name))
    }

    /// Record one attempt: schedule the word, update the profile, persist
    /// both, sync the leaderboard aggregates, and evaluate badges.
    pub async fn record(&self, user_id: DbId, input: AttemptInput) -> AppResult<RecordedAttempt> {
        let now = Utc::now();
        self.record_at(user_id, input, now).await
    }

    /// [`Self::record`] with an explicit clock, for tests.
    pub async fn record_at(
        &self,
        user_id: DbId,
        input: AttemptInput,
        now: Timestamp,
    ) -> AppResult<RecordedAttempt> {
        let log = self.storage.progress.attempts(user_id).await?;
        let profile = self.profile_or_default(user_id).await?;
        let doc_id = input.doc_id;

        let outcome = engine::record_attempt(&log, &profile, input, now);

        self.storage
            .progress
            .push_attempt(user_id, &outcome.attempt, &outcome.profile)
            .await?;
        self.storage
            .users
            .sync_progress(user_id, &outcome.profile)
            .await?;

        // Badge evaluation over the post-attempt log.
        let mut log = log;
        log.push(outcome.attempt.clone());
        let new_badges = self
            .evaluate_badges(user_id, &log, &outcome.profile, doc_id, now)
            .await?;

        tracing::debug!(
            user_id = %user_id,
            word = %outcome.attempt.key(),
            is_correct = outcome.attempt.is_correct,
            new_badges = new_badges.len(),
            "Recorded practice attempt",
        );

        Ok(RecordedAttempt {
            attempt: outcome.attempt,
            profile: outcome.profile,
            new_badges,
        })
    }

    /// Diff the badge catalog against the unlocked set and persist any new
    /// unlocks. Only the document of the current attempt is checked for
    /// perfect completion; earlier perfect documents have already unlocked
    /// the badge when they happened.
    async fn evaluate_badges(
        &self,
        user_id: DbId,
        log: &[WordAttempt],
        profile: &UserProfile,
        doc_id: DbId,
        now: Timestamp,
    ) -> AppResult<Vec<&'static BadgeDef>> {
        let perfect_documents = match self.storage.documents.get(doc_id).await? {
            Some(doc) => {
                let word_ids: Vec<i32> = doc.words.iter().map(|w| w.id).collect();
                usize::from(badges::document_completed_perfectly(doc_id, &word_ids, log))
            }
            None => 0,
        };

        let inputs = BadgeInputs {
            total_correct: profile.total_correct,
            unique_words: engine::unique_correct_words(log),
            streak: profile.streak,
            level: profile.level,
            perfect_documents,
        };

        let unlocked: BTreeSet<String> = self
            .storage
            .progress
            .unlocked_badges(user_id)
            .await?
            .into_keys()
            .collect();

        let new_badges = badges::evaluate_badges(&inputs, &unlocked);
        if !new_badges.is_empty() {
            let ids: Vec<&str> = new_badges.iter().map(|b| b.id).collect();
            self.storage.progress.unlock_badges(user_id, &ids, now).await?;
            tracing::info!(user_id = %user_id, badges = ?ids, "Unlocked badges");
        }
        Ok(new_badges)
    }

    /// The attempt log, degraded to empty when the backend is unreachable.
    /// Review and difficult-word queues stay usable offline.
    async fn log_or_empty(&self, user_id: DbId) -> Vec<WordAttempt> {
        match self.storage.progress.attempts(user_id).await {
            Ok(log) => log,
            Err(err) => {
                tracing::warn!(user_id = %user_id, error = %err, "Attempt log read degraded to empty");
                Vec::new()
            }
        }
    }

    /// Words due for review right now, most overdue first.
    pub async fn words_to_review(&self, user_id: DbId) -> AppResult<Vec<WordAttempt>> {
        Ok(engine::words_to_review(
            &self.log_or_empty(user_id).await,
            Utc::now(),
        ))
    }

    /// The words the user keeps getting wrong.
    pub async fn difficult_words(&self, user_id: DbId) -> AppResult<Vec<WordAttempt>> {
        Ok(engine::difficult_words(&self.log_or_empty(user_id).await))
    }

    /// Aggregate progress snapshot.
    pub async fn stats(&self, user_id: DbId) -> AppResult<Stats> {
        let log = self.storage.progress.attempts(user_id).await?;
        let profile = self.profile_or_default(user_id).await?;
        Ok(engine::stats(&log, &profile, Utc::now()))
    }

    pub async fn notes(&self, user_id: DbId) -> AppResult<Vec<WordNote>> {
        Ok(self.storage.progress.notes(user_id).await?)
    }

    pub async fn put_note(&self, user_id: DbId, key: WordKey, text: &str) -> AppResult<WordNote> {
        Ok(self
            .storage
            .progress
            .put_note(user_id, key, text, Utc::now())
            .await?)
    }

    pub async fn favorites(&self, user_id: DbId) -> AppResult<BTreeSet<String>> {
        Ok(self.storage.progress.favorites(user_id).await?)
    }

    /// Toggle a favorite; returns whether the word is a favorite afterwards.
    pub async fn toggle_favorite(&self, user_id: DbId, key: WordKey) -> AppResult<bool> {
        Ok(self.storage.progress.toggle_favorite(user_id, key).await?)
    }

    /// Unlocked badges joined with their catalog definitions. Ids persisted
    /// by an older catalog that no longer exist are skipped.
    pub async fn unlocked_badges(
        &self,
        user_id: DbId,
    ) -> AppResult<Vec<(&'static BadgeDef, Timestamp)>> {
        let unlocked = self.storage.progress.unlocked_badges(user_id).await?;
        Ok(unlocked
            .into_iter()
            .filter_map(|(id, at)| badges::badge_def(&id).map(|def| (def, at)))
            .collect())
    }

    /// Drop all learning state for the user.
    pub async fn reset(&self, user_id: DbId) -> AppResult<()> {
        self.storage.progress.clear(user_id).await?;
        tracing::info!(user_id = %user_id, "Cleared learning state");
        Ok(())
    }
}
