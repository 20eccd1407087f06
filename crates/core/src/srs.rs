//! Spaced-repetition scheduling (the mastery ladder).
//!
//! Review dates follow a fixed day-interval ladder indexed by how many times
//! the word has been answered correctly *before* the current attempt. The
//! index counts all historical correct answers for the word, not the current
//! run of consecutive correct answers: a wrong answer forces a 1-day review
//! but does not move the word back down the ladder.

use chrono::Duration;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Ladder constants
// ---------------------------------------------------------------------------

/// Day intervals between reviews, indexed by prior correct-answer count.
/// Capped at the last entry (60 days).
pub const REVIEW_INTERVALS: [i64; 6] = [1, 3, 7, 14, 30, 60];

/// Review delay after a wrong answer, in days.
pub const RETRY_INTERVAL_DAYS: i64 = 1;

// ---------------------------------------------------------------------------
// Scheduling
// ---------------------------------------------------------------------------

/// Number of days until the next review for an attempt.
///
/// `previous_correct_count` is the count of correct attempts for this word
/// recorded before this one. The first-ever correct answer (count 0) schedules
/// a 1-day review, not an immediate one.
pub fn review_interval_days(previous_correct_count: usize, is_correct: bool) -> i64 {
    if !is_correct {
        return RETRY_INTERVAL_DAYS;
    }
    let idx = previous_correct_count.min(REVIEW_INTERVALS.len() - 1);
    REVIEW_INTERVALS[idx]
}

/// Compute the next review date for an attempt made at `now`.
pub fn next_review_date(now: Timestamp, previous_correct_count: usize, is_correct: bool) -> Timestamp {
    now + Duration::days(review_interval_days(previous_correct_count, is_correct))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn first_correct_schedules_one_day() {
        assert_eq!(next_review_date(t0(), 0, true), t0() + Duration::days(1));
    }

    #[test]
    fn ladder_walks_through_fixed_intervals() {
        for (count, days) in [(0, 1), (1, 3), (2, 7), (3, 14), (4, 30), (5, 60)] {
            assert_eq!(
                review_interval_days(count, true),
                days,
                "count {count} should map to {days} days"
            );
        }
    }

    #[test]
    fn ladder_caps_at_sixty_days() {
        assert_eq!(review_interval_days(5, true), 60);
        assert_eq!(review_interval_days(6, true), 60);
        assert_eq!(review_interval_days(250, true), 60);
    }

    #[test]
    fn wrong_answer_always_retries_next_day() {
        for count in [0, 1, 4, 5, 99] {
            assert_eq!(review_interval_days(count, false), 1);
        }
        assert_eq!(next_review_date(t0(), 5, false), t0() + Duration::days(1));
    }
}
