//! The learning engine: pure derivations over a user's attempt log.
//!
//! The log is an append-only chronological sequence owned by the caller.
//! Nothing here touches a clock or a store; `now` is always a parameter and
//! results are returned for the caller to persist.

use std::collections::{HashMap, HashSet};

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::profile::{attempt_xp, next_streak, Level, UserProfile};
use crate::srs;
use crate::types::{DbId, Timestamp, WordKey};

// ---------------------------------------------------------------------------
// Attempt log types
// ---------------------------------------------------------------------------

/// One practice event for one word. Immutable once created;
/// `next_review_date` is fixed at creation time and never rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordAttempt {
    pub doc_id: DbId,
    pub word_id: i32,
    /// Source-script form, denormalized for history display.
    pub original: String,
    /// Latinized form, denormalized for history display.
    pub modern: String,
    pub is_correct: bool,
    pub timestamp: Timestamp,
    pub next_review_date: Timestamp,
}

impl WordAttempt {
    pub fn key(&self) -> WordKey {
        WordKey::new(self.doc_id, self.word_id)
    }
}

/// Input for recording a new attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct AttemptInput {
    pub doc_id: DbId,
    pub word_id: i32,
    pub original: String,
    pub modern: String,
    pub is_correct: bool,
}

/// Result of recording an attempt: the new log entry and the updated profile.
/// The caller appends the attempt to its log and persists both.
#[derive(Debug, Clone)]
pub struct AttemptOutcome {
    pub attempt: WordAttempt,
    pub profile: UserProfile,
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// Count of correct attempts already in the log for a word key.
///
/// This counts every historical correct answer, not the current consecutive
/// run; the ladder index deliberately survives wrong answers in between.
fn correct_count_for(log: &[WordAttempt], key: WordKey) -> usize {
    log.iter()
        .filter(|a| a.key() == key && a.is_correct)
        .count()
}

/// Distinct word keys with at least one correct attempt.
pub fn unique_correct_words(log: &[WordAttempt]) -> usize {
    log.iter()
        .filter(|a| a.is_correct)
        .map(WordAttempt::key)
        .collect::<HashSet<_>>()
        .len()
}

/// Record one practice attempt against the existing log and profile.
///
/// Pure: returns the new attempt (scheduled via the mastery ladder) and the
/// updated profile (totals, XP, streak, level). The level is recomputed from
/// the full updated log's unique-correct coverage rather than incremented.
pub fn record_attempt(
    log: &[WordAttempt],
    profile: &UserProfile,
    input: AttemptInput,
    now: Timestamp,
) -> AttemptOutcome {
    let key = WordKey::new(input.doc_id, input.word_id);
    let previous_correct = correct_count_for(log, key);

    let attempt = WordAttempt {
        doc_id: input.doc_id,
        word_id: input.word_id,
        original: input.original,
        modern: input.modern,
        is_correct: input.is_correct,
        timestamp: now,
        next_review_date: srs::next_review_date(now, previous_correct, input.is_correct),
    };

    let today = now.date_naive();
    let unique_correct = {
        // Coverage over the log as it will be after this attempt.
        let mut keys: HashSet<WordKey> = log
            .iter()
            .filter(|a| a.is_correct)
            .map(WordAttempt::key)
            .collect();
        if attempt.is_correct {
            keys.insert(key);
        }
        keys.len()
    };

    let profile = UserProfile {
        display_name: profile.display_name.clone(),
        total_attempts: profile.total_attempts + 1,
        total_correct: profile.total_correct + i64::from(input.is_correct),
        xp: profile.xp + attempt_xp(input.is_correct),
        streak: next_streak(profile.streak, profile.last_practice_date, today),
        last_practice_date: Some(today),
        level: Level::from_unique_correct(unique_correct),
    };

    AttemptOutcome { attempt, profile }
}

// ---------------------------------------------------------------------------
// Review queue
// ---------------------------------------------------------------------------

/// Latest attempt per distinct word key, in arbitrary order.
fn latest_per_word(log: &[WordAttempt]) -> HashMap<WordKey, &WordAttempt> {
    let mut latest: HashMap<WordKey, &WordAttempt> = HashMap::new();
    for attempt in log {
        latest
            .entry(attempt.key())
            .and_modify(|cur| {
                if attempt.timestamp >= cur.timestamp {
                    *cur = attempt;
                }
            })
            .or_insert(attempt);
    }
    latest
}

/// Words due for review at `now`: the latest attempt of every word whose
/// `next_review_date` has passed, most overdue first.
pub fn words_to_review(log: &[WordAttempt], now: Timestamp) -> Vec<WordAttempt> {
    let mut due: Vec<WordAttempt> = latest_per_word(log)
        .into_values()
        .filter(|a| a.next_review_date <= now)
        .cloned()
        .collect();
    due.sort_by_key(|a| (a.next_review_date, a.key()));
    due
}

// ---------------------------------------------------------------------------
// Difficult words
// ---------------------------------------------------------------------------

/// Maximum number of entries returned by [`difficult_words`].
pub const MAX_DIFFICULT_WORDS: usize = 10;

/// Words the learner keeps getting wrong.
///
/// A word qualifies only when its wrong count strictly exceeds its correct
/// count over the whole log; ties are excluded. Returns the latest attempt
/// per qualifying word, worst offenders first, capped at
/// [`MAX_DIFFICULT_WORDS`].
pub fn difficult_words(log: &[WordAttempt]) -> Vec<WordAttempt> {
    let mut tallies: HashMap<WordKey, (i64, i64)> = HashMap::new();
    for attempt in log {
        let (correct, wrong) = tallies.entry(attempt.key()).or_insert((0, 0));
        if attempt.is_correct {
            *correct += 1;
        } else {
            *wrong += 1;
        }
    }

    let mut ranked: Vec<(WordKey, i64)> = tallies
        .into_iter()
        .filter(|&(_, (correct, wrong))| wrong > correct)
        .map(|(key, (correct, wrong))| (key, wrong - correct))
        .collect();
    // Deterministic order: worst gap first, key as tiebreaker.
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let latest = latest_per_word(log);
    ranked
        .into_iter()
        .take(MAX_DIFFICULT_WORDS)
        .filter_map(|(key, _)| latest.get(&key).map(|a| (*a).clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Aggregate snapshot of a learner's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Distinct words with at least one correct answer.
    pub total_learned: usize,
    pub total_correct: i64,
    pub total_wrong: i64,
    /// Rounded percentage; 0 when there are no attempts.
    pub accuracy: i64,
    pub streak: i64,
    pub level: Level,
    pub xp: i64,
    /// Attempts whose calendar day (UTC) equals today's.
    pub today_attempts: usize,
    /// Attempts within the trailing 7 days, not calendar-aligned.
    pub weekly_attempts: usize,
}

/// Derive the stats snapshot from the log and profile at `now`.
pub fn stats(log: &[WordAttempt], profile: &UserProfile, now: Timestamp) -> Stats {
    let total_wrong = profile.total_attempts - profile.total_correct;
    let accuracy = if profile.total_attempts == 0 {
        0
    } else {
        // Rounded integer percentage.
        (profile.total_correct * 100 + profile.total_attempts / 2) / profile.total_attempts
    };

    let today = now.date_naive();
    let week_ago = now - Duration::days(7);

    Stats {
        total_learned: unique_correct_words(log),
        total_correct: profile.total_correct,
        total_wrong,
        accuracy,
        streak: profile.streak,
        level: profile.level,
        xp: profile.xp,
        today_attempts: log
            .iter()
            .filter(|a| a.timestamp.date_naive() == today)
            .count(),
        weekly_attempts: log.iter().filter(|a| a.timestamp >= week_ago).count(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn doc() -> DbId {
        Uuid::from_u128(0xD0C)
    }

    fn input(word_id: i32, is_correct: bool) -> AttemptInput {
        AttemptInput {
            doc_id: doc(),
            word_id,
            original: "كتاب".into(),
            modern: "kitap".into(),
            is_correct,
        }
    }

    /// Run a sequence of (word_id, is_correct, at) through the engine,
    /// accumulating the log and profile like a real caller.
    fn run(events: &[(i32, bool, Timestamp)]) -> (Vec<WordAttempt>, UserProfile) {
        let mut log = Vec::new();
        let mut profile = UserProfile::new("test");
        for &(word_id, is_correct, at) in events {
            let outcome = record_attempt(&log, &profile, input(word_id, is_correct), at);
            log.push(outcome.attempt);
            profile = outcome.profile;
        }
        (log, profile)
    }

    // -- scheduling --

    #[test]
    fn consecutive_correct_answers_climb_the_ladder() {
        let events: Vec<_> = (0..6)
            .map(|i| (1, true, t0() + Duration::days(i * 90)))
            .collect();
        let (log, _) = run(&events);
        let expected = [1, 3, 7, 14, 30, 60];
        for (attempt, days) in log.iter().zip(expected) {
            assert_eq!(
                attempt.next_review_date - attempt.timestamp,
                Duration::days(days)
            );
        }
    }

    #[test]
    fn wrong_answer_schedules_next_day_regardless_of_history() {
        let (log, _) = run(&[
            (1, true, t0()),
            (1, true, t0() + Duration::days(1)),
            (1, true, t0() + Duration::days(4)),
            (1, false, t0() + Duration::days(11)),
        ]);
        let last = log.last().unwrap();
        assert_eq!(last.next_review_date - last.timestamp, Duration::days(1));
    }

    #[test]
    fn ladder_index_counts_all_prior_correct_answers() {
        // correct, correct, wrong, correct on four consecutive days: the
        // final correct answer indexes the ladder with 2 prior corrects,
        // giving a 7-day interval (the failure did not reset the position).
        let (log, _) = run(&[
            (1, true, t0()),
            (1, true, t0() + Duration::days(1)),
            (1, false, t0() + Duration::days(2)),
            (1, true, t0() + Duration::days(3)),
        ]);
        let intervals: Vec<i64> = log
            .iter()
            .map(|a| (a.next_review_date - a.timestamp).num_days())
            .collect();
        assert_eq!(intervals, vec![1, 3, 1, 7]);
    }

    #[test]
    fn different_words_have_independent_ladders() {
        let (log, _) = run(&[(1, true, t0()), (2, true, t0() + Duration::hours(1))]);
        for attempt in &log {
            assert_eq!(attempt.next_review_date - attempt.timestamp, Duration::days(1));
        }
    }

    // -- profile updates --

    #[test]
    fn totals_and_xp_accumulate() {
        let (_, profile) = run(&[
            (1, true, t0()),
            (2, false, t0() + Duration::hours(1)),
            (3, true, t0() + Duration::hours(2)),
        ]);
        assert_eq!(profile.total_attempts, 3);
        assert_eq!(profile.total_correct, 2);
        assert_eq!(profile.xp, 22); // 10 + 2 + 10
    }

    #[test]
    fn streak_increments_across_consecutive_days_only() {
        let (_, profile) = run(&[
            (1, true, t0()),
            (1, true, t0() + Duration::days(1)),
            (1, true, t0() + Duration::days(1) + Duration::hours(2)),
            (1, true, t0() + Duration::days(2)),
        ]);
        assert_eq!(profile.streak, 3);
    }

    #[test]
    fn streak_resets_after_missed_day() {
        let (_, profile) = run(&[
            (1, true, t0()),
            (1, true, t0() + Duration::days(1)),
            (1, true, t0() + Duration::days(4)),
        ]);
        assert_eq!(profile.streak, 1);
    }

    #[test]
    fn level_does_not_regress_on_wrong_answers() {
        // 50 distinct correct words, then a run of failures.
        let mut events: Vec<_> = (0..50).map(|i| (i, true, t0())).collect();
        events.extend((0..20).map(|i| (i, false, t0() + Duration::days(1))));
        let (_, profile) = run(&events);
        assert_eq!(profile.level, Level::Intermediate);
    }

    // -- review queue --

    #[test]
    fn review_queue_returns_due_words_most_overdue_first() {
        let (log, _) = run(&[
            (1, true, t0()),                      // due t0 + 1d
            (2, false, t0() + Duration::hours(1)), // due t0 + 1d 1h
            (3, true, t0() + Duration::days(30)),  // far in the future
        ]);
        let due = words_to_review(&log, t0() + Duration::days(2));
        let ids: Vec<i32> = due.iter().map(|a| a.word_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn review_queue_uses_latest_attempt_per_word() {
        let (log, _) = run(&[(1, true, t0()), (1, true, t0() + Duration::days(2))]);
        // Second correct pushes the review to day 2 + 3; nothing is due at day 3.
        assert!(words_to_review(&log, t0() + Duration::days(3)).is_empty());
        let due = words_to_review(&log, t0() + Duration::days(6));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].timestamp, t0() + Duration::days(2));
    }

    // -- difficult words --

    #[test]
    fn difficult_words_require_strictly_more_wrong_than_correct() {
        let (log, _) = run(&[
            (1, false, t0()),
            (1, true, t0() + Duration::hours(1)), // tied: excluded
            (2, false, t0() + Duration::hours(2)),
            (2, false, t0() + Duration::hours(3)),
            (3, true, t0() + Duration::hours(4)),
        ]);
        let hard = difficult_words(&log);
        assert_eq!(hard.len(), 1);
        assert_eq!(hard[0].word_id, 2);
    }

    #[test]
    fn difficult_words_ranked_by_gap_and_capped_at_ten() {
        let mut events = Vec::new();
        // Word i gets i wrong answers (i = 1..=12), word 12 is the worst.
        for i in 1..=12 {
            for j in 0..i {
                events.push((i, false, t0() + Duration::minutes(i64::from(i) * 60 + i64::from(j))));
            }
        }
        let (log, _) = run(&events);
        let hard = difficult_words(&log);
        assert_eq!(hard.len(), MAX_DIFFICULT_WORDS);
        assert_eq!(hard[0].word_id, 12);
        assert_eq!(hard[9].word_id, 3);
    }

    // -- stats --

    #[test]
    fn stats_accuracy_is_zero_without_attempts() {
        let s = stats(&[], &UserProfile::new("fresh"), t0());
        assert_eq!(s.accuracy, 0);
        assert_eq!(s.total_learned, 0);
        assert_eq!(s.total_wrong, 0);
    }

    #[test]
    fn stats_accuracy_rounds_to_nearest_percent() {
        let (log, profile) = run(&[
            (1, true, t0()),
            (2, true, t0() + Duration::hours(1)),
            (3, false, t0() + Duration::hours(2)),
        ]);
        let s = stats(&log, &profile, t0() + Duration::hours(3));
        assert_eq!(s.accuracy, 67); // 2/3 rounded
        assert_eq!(s.total_learned, 2);
    }

    #[test]
    fn stats_window_counters() {
        let now = t0() + Duration::days(10);
        let (log, profile) = run(&[
            (1, true, t0()),                       // outside the week
            (2, true, now - Duration::days(6)),    // inside the week
            (3, true, now - Duration::hours(2)),   // today
        ]);
        let s = stats(&log, &profile, now);
        assert_eq!(s.today_attempts, 1);
        assert_eq!(s.weekly_attempts, 2);
    }
}
