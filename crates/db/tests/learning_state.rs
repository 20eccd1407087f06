//! Integration tests for the local learning-state repository:
//! - attempt log append and round-trip
//! - note upsert semantics
//! - favorite toggle idempotence
//! - one-way badge unlocks
//! - per-user isolation and clearing

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use defter_core::engine::WordAttempt;
use defter_core::profile::UserProfile;
use defter_core::types::{Timestamp, WordKey};
use defter_db::kv::MemoryStore;
use defter_db::Storage;
use uuid::Uuid;

fn storage() -> Storage {
    Storage::local(Arc::new(MemoryStore::new()))
}

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
}

fn attempt(word_id: i32, is_correct: bool, at: Timestamp) -> WordAttempt {
    WordAttempt {
        doc_id: Uuid::from_u128(0xD0C),
        word_id,
        original: "كتاب".to_string(),
        modern: "kitap".to_string(),
        is_correct,
        timestamp: at,
        next_review_date: at + Duration::days(1),
    }
}

#[tokio::test]
async fn attempt_log_appends_in_order() {
    let storage = storage();
    let user = Uuid::now_v7();
    let profile = UserProfile::new("test");

    for i in 0..3 {
        storage
            .progress
            .push_attempt(user, &attempt(i, i % 2 == 0, t0() + Duration::hours(i.into())), &profile)
            .await
            .unwrap();
    }

    let log = storage.progress.attempts(user).await.unwrap();
    let ids: Vec<i32> = log.iter().map(|a| a.word_id).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert_eq!(log[1].timestamp, t0() + Duration::hours(1));
}

#[tokio::test]
async fn push_attempt_persists_profile_alongside() {
    let storage = storage();
    let user = Uuid::now_v7();
    let mut profile = UserProfile::new("Ayşe");
    profile.total_attempts = 1;
    profile.total_correct = 1;
    profile.xp = 10;
    profile.streak = 1;
    profile.last_practice_date = Some(t0().date_naive());

    storage
        .progress
        .push_attempt(user, &attempt(1, true, t0()), &profile)
        .await
        .unwrap();

    let stored = storage.progress.profile(user).await.unwrap().unwrap();
    assert_eq!(stored, profile);
}

#[tokio::test]
async fn note_upsert_replaces_prior_text() {
    let storage = storage();
    let user = Uuid::now_v7();
    let key = WordKey::new(Uuid::from_u128(0xD0C), 4);

    storage
        .progress
        .put_note(user, key, "ilk not", t0())
        .await
        .unwrap();
    let replaced = storage
        .progress
        .put_note(user, key, "düzeltilmiş not", t0() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(replaced.text, "düzeltilmiş not");

    let notes = storage.progress.notes(user).await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].text, "düzeltilmiş not");
    assert_eq!(notes[0].doc_id, key.doc_id);
    assert_eq!(notes[0].word_id, 4);
}

#[tokio::test]
async fn favorite_toggle_twice_restores_membership() {
    let storage = storage();
    let user = Uuid::now_v7();
    let key = WordKey::new(Uuid::from_u128(0xD0C), 7);

    assert!(storage.progress.toggle_favorite(user, key).await.unwrap());
    assert_eq!(storage.progress.favorites(user).await.unwrap().len(), 1);

    assert!(!storage.progress.toggle_favorite(user, key).await.unwrap());
    assert!(storage.progress.favorites(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn badge_unlocks_keep_original_timestamp() {
    let storage = storage();
    let user = Uuid::now_v7();

    storage
        .progress
        .unlock_badges(user, &["first_word"], t0())
        .await
        .unwrap();
    storage
        .progress
        .unlock_badges(user, &["first_word", "streak_3"], t0() + Duration::days(3))
        .await
        .unwrap();

    let unlocked = storage.progress.unlocked_badges(user).await.unwrap();
    assert_eq!(unlocked.len(), 2);
    assert_eq!(unlocked["first_word"], t0());
    assert_eq!(unlocked["streak_3"], t0() + Duration::days(3));
}

#[tokio::test]
async fn users_are_fully_isolated() {
    let storage = storage();
    let alice = Uuid::now_v7();
    let bora = Uuid::now_v7();
    let profile = UserProfile::new("x");

    storage
        .progress
        .push_attempt(alice, &attempt(1, true, t0()), &profile)
        .await
        .unwrap();
    storage
        .progress
        .toggle_favorite(alice, WordKey::new(Uuid::from_u128(1), 1))
        .await
        .unwrap();

    assert!(storage.progress.attempts(bora).await.unwrap().is_empty());
    assert!(storage.progress.favorites(bora).await.unwrap().is_empty());
    assert!(storage.progress.profile(bora).await.unwrap().is_none());
}

#[tokio::test]
async fn clear_drops_all_state_for_one_user_only() {
    let storage = storage();
    let alice = Uuid::now_v7();
    let bora = Uuid::now_v7();
    let profile = UserProfile::new("x");

    for user in [alice, bora] {
        storage
            .progress
            .push_attempt(user, &attempt(1, true, t0()), &profile)
            .await
            .unwrap();
        storage
            .progress
            .unlock_badges(user, &["first_word"], t0())
            .await
            .unwrap();
    }

    storage.progress.clear(alice).await.unwrap();

    assert!(storage.progress.attempts(alice).await.unwrap().is_empty());
    assert!(storage.progress.unlocked_badges(alice).await.unwrap().is_empty());
    assert!(storage.progress.profile(alice).await.unwrap().is_none());
    // Bora's state is untouched.
    assert_eq!(storage.progress.attempts(bora).await.unwrap().len(), 1);
}
