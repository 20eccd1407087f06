//! Learner profile: XP, daily streak, and level rules.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// XP
// ---------------------------------------------------------------------------

/// XP awarded for a correct answer.
pub const XP_CORRECT: i64 = 10;

/// XP awarded for a wrong answer. Wrong answers still earn a little XP so
/// practice itself is never punished.
pub const XP_WRONG: i64 = 2;

/// XP for one attempt.
pub fn attempt_xp(is_correct: bool) -> i64 {
    if is_correct {
        XP_CORRECT
    } else {
        XP_WRONG
    }
}

// ---------------------------------------------------------------------------
// Levels
// ---------------------------------------------------------------------------

/// Unique-correct-word count at which a learner reaches Intermediate.
pub const INTERMEDIATE_THRESHOLD: usize = 50;
/// Unique-correct-word count at which a learner reaches Advanced.
pub const ADVANCED_THRESHOLD: usize = 150;
/// Unique-correct-word count at which a learner reaches Expert.
pub const EXPERT_THRESHOLD: usize = 300;

/// Learner level, derived from how many distinct words have at least one
/// correct answer. Correct coverage never shrinks, so the level can only
/// move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Level {
    /// Derive the level from the number of distinct correctly-answered words.
    pub fn from_unique_correct(count: usize) -> Self {
        if count >= EXPERT_THRESHOLD {
            Self::Expert
        } else if count >= ADVANCED_THRESHOLD {
            Self::Advanced
        } else if count >= INTERMEDIATE_THRESHOLD {
            Self::Intermediate
        } else {
            Self::Beginner
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
            Self::Expert => "expert",
        }
    }

    /// Lenient parse for stored values; unknown strings map to `Beginner`.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            "expert" => Self::Expert,
            _ => Self::Beginner,
        }
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::Beginner
    }
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// Aggregate learner state. Mutated only through
/// [`crate::engine::record_attempt`], apart from the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub display_name: String,
    pub total_correct: i64,
    pub total_attempts: i64,
    /// Consecutive practice days, counting today when practiced.
    pub streak: i64,
    pub last_practice_date: Option<NaiveDate>,
    pub level: Level,
    pub xp: i64,
}

impl UserProfile {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            total_correct: 0,
            total_attempts: 0,
            streak: 0,
            last_practice_date: None,
            level: Level::Beginner,
            xp: 0,
        }
    }
}

/// Updated streak after an attempt on `today`.
///
/// Same-day practice leaves the streak alone; practice the day after the last
/// session extends it; any longer gap (or a first-ever session) restarts at 1.
pub fn next_streak(streak: i64, last_practice_date: Option<NaiveDate>, today: NaiveDate) -> i64 {
    match last_practice_date {
        Some(last) if last == today => streak,
        Some(last) if last.succ_opt() == Some(today) => streak + 1,
        _ => 1,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(Level::from_unique_correct(0), Level::Beginner);
        assert_eq!(Level::from_unique_correct(49), Level::Beginner);
        assert_eq!(Level::from_unique_correct(50), Level::Intermediate);
        assert_eq!(Level::from_unique_correct(149), Level::Intermediate);
        assert_eq!(Level::from_unique_correct(150), Level::Advanced);
        assert_eq!(Level::from_unique_correct(299), Level::Advanced);
        assert_eq!(Level::from_unique_correct(300), Level::Expert);
        assert_eq!(Level::from_unique_correct(1000), Level::Expert);
    }

    #[test]
    fn streak_extends_after_consecutive_day() {
        assert_eq!(next_streak(4, Some(day(9)), day(10)), 5);
    }

    #[test]
    fn streak_unchanged_same_day() {
        assert_eq!(next_streak(4, Some(day(10)), day(10)), 4);
    }

    #[test]
    fn streak_resets_after_gap() {
        assert_eq!(next_streak(4, Some(day(7)), day(10)), 1);
    }

    #[test]
    fn streak_starts_at_one_on_first_practice() {
        assert_eq!(next_streak(0, None, day(10)), 1);
    }

    #[test]
    fn streak_extends_across_month_boundary() {
        let last = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        assert_eq!(next_streak(2, Some(last), today), 3);
    }

    #[test]
    fn xp_awards() {
        assert_eq!(attempt_xp(true), 10);
        assert_eq!(attempt_xp(false), 2);
    }
}
