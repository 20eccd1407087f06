//! Remote learning-state repository.
//!
//! The attempt log is row-per-attempt in `user_word_progress`; the profile
//! aggregate is upserted into `user_progress`. Notes, favorites, and badge
//! unlocks are composite-key upserts.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use defter_core::engine::WordAttempt;
use defter_core::profile::UserProfile;
use defter_core::types::{DbId, Timestamp, WordKey};

use crate::error::StoreResult;
use crate::models::WordNote;
use crate::repositories::ProgressRepository;
use crate::DbPool;

use super::rows::{AttemptRow, NoteRow, ProgressRow};

/// Column list for `user_word_progress` reads.
const ATTEMPT_COLUMNS: &str =
    "doc_id, word_id, original, modern, is_correct, attempted_at, next_review_at";

/// Column list for `user_progress` reads.
const PROFILE_COLUMNS: &str =
    "display_name, total_correct, total_attempts, streak, last_practice_date, level, xp";

pub struct RemoteProgressRepo {
    pool: DbPool,
}

impl RemoteProgressRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressRepository for RemoteProgressRepo {
    async fn attempts(&self, user_id: DbId) -> StoreResult<Vec<WordAttempt>> {
        // Insertion order (serial id) is the chronological order.
        let query = format!(
            "SELECT {ATTEMPT_COLUMNS} FROM user_word_progress WHERE user_id = $1 ORDER BY id"
        );
        let rows = sqlx::query_as::<_, AttemptRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn push_attempt(
        &self,
        user_id: DbId,
        attempt: &WordAttempt,
        profile: &UserProfile,
    ) -> StoreResult<()> {
        // Attempt first, then the profile, matching the caller's issue order.
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO user_word_progress \
                 (user_id, doc_id, word_id, original, modern, is_correct, \
                  attempted_at, next_review_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user_id)
        .bind(attempt.doc_id)
        .bind(attempt.word_id)
        .bind(&attempt.original)
        .bind(&attempt.modern)
        .bind(attempt.is_correct)
        .bind(attempt.timestamp)
        .bind(attempt.next_review_date)
        .execute(&mut *tx)
        .await?;
        upsert_profile(&mut tx, user_id, profile).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn profile(&self, user_id: DbId) -> StoreResult<Option<UserProfile>> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM user_progress WHERE user_id = $1");
        let row = sqlx::query_as::<_, ProgressRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn save_profile(&self, user_id: DbId, profile: &UserProfile) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        upsert_profile(&mut tx, user_id, profile).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn notes(&self, user_id: DbId) -> StoreResult<Vec<WordNote>> {
        let rows = sqlx::query_as::<_, NoteRow>(
            "SELECT doc_id, word_id, note, updated_at FROM user_notes \
             WHERE user_id = $1 ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn put_note(
        &self,
        user_id: DbId,
        key: WordKey,
        text: &str,
        at: Timestamp,
    ) -> StoreResult<WordNote> {
        let row = sqlx::query_as::<_, NoteRow>(
            "INSERT INTO user_notes (user_id, doc_id, word_id, note, updated_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, doc_id, word_id) DO UPDATE SET
                 note = EXCLUDED.note,
                 updated_at = EXCLUDED.updated_at
             RETURNING doc_id, word_id, note, updated_at",
        )
        .bind(user_id)
        .bind(key.doc_id)
        .bind(key.word_id)
        .bind(text)
        .bind(at)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn favorites(&self, user_id: DbId) -> StoreResult<BTreeSet<String>> {
        let rows: Vec<(DbId, i32)> =
            sqlx::query_as("SELECT doc_id, word_id FROM user_favorites WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows
            .into_iter()
            .map(|(doc_id, word_id)| WordKey::new(doc_id, word_id).to_string())
            .collect())
    }

    async fn toggle_favorite(&self, user_id: DbId, key: WordKey) -> StoreResult<bool> {
        let mut tx = self.pool.begin().await?;
        let removed = sqlx::query(
            "DELETE FROM user_favorites WHERE user_id = $1 AND doc_id = $2 AND word_id = $3",
        )
        .bind(user_id)
        .bind(key.doc_id)
        .bind(key.word_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let now_member = removed == 0;
        if now_member {
            sqlx::query(
                "INSERT INTO user_favorites (user_id, doc_id, word_id) VALUES ($1, $2, $3) \
                 ON CONFLICT DO NOTHING",
            )
            .bind(user_id)
            .bind(key.doc_id)
            .bind(key.word_id)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(now_member)
    }

    async fn unlocked_badges(&self, user_id: DbId) -> StoreResult<BTreeMap<String, Timestamp>> {
        let rows: Vec<(String, Timestamp)> =
            sqlx::query_as("SELECT badge_id, unlocked_at FROM user_badges WHERE user_id = $1")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    async fn unlock_badges(&self, user_id: DbId, ids: &[&str], at: Timestamp) -> StoreResult<()> {
        for id in ids {
            // DO NOTHING keeps the original unlock timestamp.
            sqlx::query(
                "INSERT INTO user_badges (user_id, badge_id, unlocked_at) VALUES ($1, $2, $3) \
                 ON CONFLICT (user_id, badge_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }

    async fn clear(&self, user_id: DbId) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;
        for table in [
            "user_word_progress",
            "user_progress",
            "user_notes",
            "user_favorites",
            "user_badges",
        ] {
            sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

async fn upsert_profile(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    user_id: DbId,
    profile: &UserProfile,
) -> StoreResult<()> {
    sqlx::query(
        "INSERT INTO user_progress \
             (user_id, display_name, total_correct, total_attempts, streak, \
              last_practice_date, level, xp)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         ON CONFLICT (user_id) DO UPDATE SET
             display_name = EXCLUDED.display_name,
             total_correct = EXCLUDED.total_correct,
             total_attempts = EXCLUDED.total_attempts,
             streak = EXCLUDED.streak,
             last_practice_date = EXCLUDED.last_practice_date,
             level = EXCLUDED.level,
             xp = EXCLUDED.xp",
    )
    .bind(user_id)
    .bind(&profile.display_name)
    .bind(profile.total_correct)
    .bind(profile.total_attempts)
    .bind(profile.streak)
    .bind(profile.last_practice_date)
    .bind(profile.level.label())
    .bind(profile.xp)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
