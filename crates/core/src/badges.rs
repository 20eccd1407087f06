//! Achievement badges.
//!
//! The catalog is fixed; per-user state is only the set of unlocked badge
//! ids. Evaluation is pure: the caller passes the current aggregates and the
//! already-unlocked set and receives the newly satisfied badges as a diff to
//! persist. Unlocks are one-way; an unlocked badge is never re-evaluated.

use std::collections::BTreeSet;

use crate::engine::WordAttempt;
use crate::profile::Level;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Aggregate state a badge predicate can look at.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeInputs {
    pub total_correct: i64,
    /// Distinct words with at least one correct answer.
    pub unique_words: usize,
    pub streak: i64,
    pub level: Level,
    /// Documents the learner has completed without a single mistake.
    pub perfect_documents: usize,
}

/// One badge definition.
#[derive(Debug)]
pub struct BadgeDef {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub description: &'static str,
    predicate: fn(&BadgeInputs) -> bool,
}

/// The fixed badge catalog.
pub const CATALOG: &[BadgeDef] = &[
    BadgeDef {
        id: "first_word",
        name: "İlk Kelime",
        icon: "🌱",
        description: "Answer your first word correctly",
        predicate: |s| s.total_correct >= 1,
    },
    BadgeDef {
        id: "words_10",
        name: "Çırak",
        icon: "📖",
        description: "Learn 10 distinct words",
        predicate: |s| s.unique_words >= 10,
    },
    BadgeDef {
        id: "words_50",
        name: "Kalfa",
        icon: "📚",
        description: "Learn 50 distinct words",
        predicate: |s| s.unique_words >= 50,
    },
    BadgeDef {
        id: "words_100",
        name: "Hattat",
        icon: "🖋️",
        description: "Learn 100 distinct words",
        predicate: |s| s.unique_words >= 100,
    },
    BadgeDef {
        id: "streak_3",
        name: "Üç Gün",
        icon: "🔥",
        description: "Practice 3 days in a row",
        predicate: |s| s.streak >= 3,
    },
    BadgeDef {
        id: "streak_7",
        name: "Bir Hafta",
        icon: "⚡",
        description: "Practice 7 days in a row",
        predicate: |s| s.streak >= 7,
    },
    BadgeDef {
        id: "streak_30",
        name: "Bir Ay",
        icon: "🌙",
        description: "Practice 30 days in a row",
        predicate: |s| s.streak >= 30,
    },
    BadgeDef {
        id: "correct_100",
        name: "Yüzbaşı",
        icon: "💯",
        description: "Give 100 correct answers",
        predicate: |s| s.total_correct >= 100,
    },
    BadgeDef {
        id: "correct_500",
        name: "Binbaşı",
        icon: "🏅",
        description: "Give 500 correct answers",
        predicate: |s| s.total_correct >= 500,
    },
    BadgeDef {
        id: "perfect_document",
        name: "Kusursuz",
        icon: "✨",
        description: "Complete a document without a single mistake",
        predicate: |s| s.perfect_documents >= 1,
    },
    BadgeDef {
        id: "level_intermediate",
        name: "Orta Seviye",
        icon: "🥈",
        description: "Reach the intermediate level",
        predicate: |s| s.level >= Level::Intermediate,
    },
    BadgeDef {
        id: "level_advanced",
        name: "İleri Seviye",
        icon: "🥇",
        description: "Reach the advanced level",
        predicate: |s| s.level >= Level::Advanced,
    },
    BadgeDef {
        id: "level_expert",
        name: "Üstad",
        icon: "👑",
        description: "Reach the expert level",
        predicate: |s| s.level >= Level::Expert,
    },
];

/// Look up a badge definition by id.
pub fn badge_def(id: &str) -> Option<&'static BadgeDef> {
    CATALOG.iter().find(|b| b.id == id)
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate the whole catalog and return badges that are newly satisfied.
///
/// Already-unlocked badges are skipped, never revoked. The caller applies the
/// diff (persisting each returned id with an unlock timestamp), which makes
/// repeated evaluation idempotent.
pub fn evaluate_badges(
    inputs: &BadgeInputs,
    unlocked: &BTreeSet<String>,
) -> Vec<&'static BadgeDef> {
    CATALOG
        .iter()
        .filter(|b| !unlocked.contains(b.id) && (b.predicate)(inputs))
        .collect()
}

/// Whether a learner has completed a document perfectly: every word in it
/// answered correctly at least once, with no wrong attempts anywhere in the
/// document.
pub fn document_completed_perfectly(doc_id: DbId, word_ids: &[i32], log: &[WordAttempt]) -> bool {
    if word_ids.is_empty() {
        return false;
    }
    let mut correct = BTreeSet::new();
    for attempt in log.iter().filter(|a| a.doc_id == doc_id) {
        if attempt.is_correct {
            correct.insert(attempt.word_id);
        } else {
            return false;
        }
    }
    word_ids.iter().all(|id| correct.contains(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::*;
    use crate::types::Timestamp;

    fn ids(badges: &[&BadgeDef]) -> Vec<&'static str> {
        badges.iter().map(|b| b.id).collect()
    }

    #[test]
    fn catalog_ids_are_unique() {
        let unique: BTreeSet<_> = CATALOG.iter().map(|b| b.id).collect();
        assert_eq!(unique.len(), CATALOG.len());
    }

    #[test]
    fn first_correct_answer_unlocks_first_word() {
        let inputs = BadgeInputs {
            total_correct: 1,
            unique_words: 1,
            streak: 1,
            ..Default::default()
        };
        assert_eq!(ids(&evaluate_badges(&inputs, &BTreeSet::new())), ["first_word"]);
    }

    #[test]
    fn unlocked_badges_are_not_returned_again() {
        let inputs = BadgeInputs {
            total_correct: 1,
            unique_words: 1,
            streak: 1,
            ..Default::default()
        };
        let unlocked: BTreeSet<String> = ["first_word".to_string()].into();
        assert!(evaluate_badges(&inputs, &unlocked).is_empty());
    }

    #[test]
    fn milestones_unlock_together_when_jumped_over() {
        // A state that satisfies several tiers at once returns all of them.
        let inputs = BadgeInputs {
            total_correct: 120,
            unique_words: 55,
            streak: 8,
            level: Level::Intermediate,
            perfect_documents: 0,
        };
        let newly = ids(&evaluate_badges(&inputs, &BTreeSet::new()));
        for expected in [
            "first_word",
            "words_10",
            "words_50",
            "streak_3",
            "streak_7",
            "correct_100",
            "level_intermediate",
        ] {
            assert!(newly.contains(&expected), "missing {expected}");
        }
        assert!(!newly.contains(&"streak_30"));
        assert!(!newly.contains(&"level_advanced"));
    }

    #[test]
    fn perfect_document_requires_full_correct_coverage() {
        let doc = Uuid::from_u128(1);
        let at: Timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let attempt = |word_id: i32, is_correct: bool, offset: i64| WordAttempt {
            doc_id: doc,
            word_id,
            original: String::new(),
            modern: String::new(),
            is_correct,
            timestamp: at + Duration::minutes(offset),
            next_review_date: at + Duration::days(1),
        };

        let log = vec![attempt(1, true, 0), attempt(2, true, 1)];
        assert!(document_completed_perfectly(doc, &[1, 2], &log));

        // Missing coverage of word 3.
        assert!(!document_completed_perfectly(doc, &[1, 2, 3], &log));

        // A single mistake disqualifies the document.
        let with_mistake = vec![attempt(1, true, 0), attempt(2, false, 1), attempt(2, true, 2)];
        assert!(!document_completed_perfectly(doc, &[1, 2], &with_mistake));

        // An empty document can never be perfect.
        assert!(!document_completed_perfectly(doc, &[], &log));
    }
}
