//! Stored record shapes for the local backend.
//!
//! These mirror the legacy browser-storage format: camelCase field names,
//! ids as strings, timestamps as epoch milliseconds, dates as `YYYY-MM-DD`
//! strings, enums as lowercase strings. Mapping to the canonical models is
//! total: any missing or unparseable field is defaulted deterministically,
//! never surfaced as an error.

use chrono::NaiveDate;
use defter_core::engine::WordAttempt;
use defter_core::profile::{Level, UserProfile};
use defter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    ArchivalDocument, Difficulty, ErrorReport, ReportStatus, Role, UserAccount, WordCoords,
    WordToken,
};

// ---------------------------------------------------------------------------
// Primitive conversions
// ---------------------------------------------------------------------------

/// Parse a stored id; an unparseable id maps to the nil UUID rather than
/// failing the whole read.
pub fn parse_id(s: &str) -> DbId {
    Uuid::parse_str(s).unwrap_or(Uuid::nil())
}

/// Epoch milliseconds to timestamp, clamped to the epoch on overflow.
pub fn from_millis(ms: i64) -> Timestamp {
    Timestamp::from_timestamp_millis(ms).unwrap_or_else(|| Timestamp::from_timestamp_millis(0).unwrap())
}

pub fn to_millis(at: Timestamp) -> i64 {
    at.timestamp_millis()
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

// ---------------------------------------------------------------------------
// Documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCoords {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredWord {
    #[serde(default)]
    pub id: i32,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub modern: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub coords: Option<StoredCoords>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDocument {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub words: Vec<StoredWord>,
    #[serde(default)]
    pub created_at: i64,
}

impl From<StoredDocument> for ArchivalDocument {
    fn from(rec: StoredDocument) -> Self {
        Self {
            id: parse_id(&rec.id),
            title: rec.title,
            category: rec.category,
            difficulty: Difficulty::parse_or_default(&rec.difficulty),
            year: rec.year,
            image_url: rec.image_url,
            words: rec.words.into_iter().map(Into::into).collect(),
            created_at: from_millis(rec.created_at),
        }
    }
}

impl From<&ArchivalDocument> for StoredDocument {
    fn from(doc: &ArchivalDocument) -> Self {
        Self {
            id: doc.id.to_string(),
            title: doc.title.clone(),
            category: doc.category.clone(),
            difficulty: doc.difficulty.as_str().to_string(),
            year: doc.year,
            image_url: doc.image_url.clone(),
            words: doc.words.iter().map(Into::into).collect(),
            created_at: to_millis(doc.created_at),
        }
    }
}

impl From<StoredWord> for WordToken {
    fn from(rec: StoredWord) -> Self {
        Self {
            id: rec.id,
            original: rec.original,
            modern: rec.modern,
            note: rec.note,
            coords: rec.coords.map(|c| WordCoords {
                x: c.x,
                y: c.y,
                width: c.width,
                height: c.height,
            }),
        }
    }
}

impl From<&WordToken> for StoredWord {
    fn from(word: &WordToken) -> Self {
        Self {
            id: word.id,
            original: word.original.clone(),
            modern: word.modern.clone(),
            note: word.note.clone(),
            coords: word.coords.map(|c| StoredCoords {
                x: c.x,
                y: c.y,
                width: c.width,
                height: c.height,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredUser {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub xp: i64,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub streak: i64,
    #[serde(default)]
    pub created_at: i64,
}

impl From<StoredUser> for UserAccount {
    fn from(rec: StoredUser) -> Self {
        Self {
            id: parse_id(&rec.id),
            username: rec.username,
            display_name: rec.display_name,
            role: Role::parse_or_default(&rec.role),
            xp: rec.xp,
            level: Level::parse_or_default(&rec.level),
            streak: rec.streak,
            created_at: from_millis(rec.created_at),
        }
    }
}

impl From<&UserAccount> for StoredUser {
    fn from(user: &UserAccount) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            role: user.role.as_str().to_string(),
            xp: user.xp,
            level: user.level.label().to_string(),
            streak: user.streak,
            created_at: to_millis(user.created_at),
        }
    }
}

// ---------------------------------------------------------------------------
// Error reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReport {
    pub id: String,
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub word_id: i32,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub current_modern: String,
    #[serde(default)]
    pub suggested_modern: String,
    #[serde(default)]
    pub reporter_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub created_at: i64,
    #[serde(default)]
    pub resolved_at: Option<i64>,
}

impl From<StoredReport> for ErrorReport {
    fn from(rec: StoredReport) -> Self {
        Self {
            id: parse_id(&rec.id),
            doc_id: parse_id(&rec.doc_id),
            word_id: rec.word_id,
            original: rec.original,
            current_modern: rec.current_modern,
            suggested_modern: rec.suggested_modern,
            reporter_id: rec.reporter_id.as_deref().map(parse_id),
            status: ReportStatus::parse_or_default(&rec.status),
            created_at: from_millis(rec.created_at),
            resolved_at: rec.resolved_at.map(from_millis),
        }
    }
}

impl From<&ErrorReport> for StoredReport {
    fn from(report: &ErrorReport) -> Self {
        Self {
            id: report.id.to_string(),
            doc_id: report.doc_id.to_string(),
            word_id: report.word_id,
            original: report.original.clone(),
            current_modern: report.current_modern.clone(),
            suggested_modern: report.suggested_modern.clone(),
            reporter_id: report.reporter_id.map(|id| id.to_string()),
            status: report.status.as_str().to_string(),
            created_at: to_millis(report.created_at),
            resolved_at: report.resolved_at.map(to_millis),
        }
    }
}

// ---------------------------------------------------------------------------
// Learning state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttempt {
    #[serde(default)]
    pub doc_id: String,
    #[serde(default)]
    pub word_id: i32,
    #[serde(default)]
    pub original: String,
    #[serde(default)]
    pub modern: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub next_review_date: i64,
}

impl From<StoredAttempt> for WordAttempt {
    fn from(rec: StoredAttempt) -> Self {
        Self {
            doc_id: parse_id(&rec.doc_id),
            word_id: rec.word_id,
            original: rec.original,
            modern: rec.modern,
            is_correct: rec.is_correct,
            timestamp: from_millis(rec.timestamp),
            next_review_date: from_millis(rec.next_review_date),
        }
    }
}

impl From<&WordAttempt> for StoredAttempt {
    fn from(attempt: &WordAttempt) -> Self {
        Self {
            doc_id: attempt.doc_id.to_string(),
            word_id: attempt.word_id,
            original: attempt.original.clone(),
            modern: attempt.modern.clone(),
            is_correct: attempt.is_correct,
            timestamp: to_millis(attempt.timestamp),
            next_review_date: to_millis(attempt.next_review_date),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredProfile {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub total_correct: i64,
    #[serde(default)]
    pub total_attempts: i64,
    #[serde(default)]
    pub streak: i64,
    /// `YYYY-MM-DD`, or absent when the user has never practiced.
    #[serde(default)]
    pub last_practice_date: Option<String>,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub xp: i64,
}

impl From<StoredProfile> for UserProfile {
    fn from(rec: StoredProfile) -> Self {
        Self {
            display_name: rec.display_name,
            total_correct: rec.total_correct,
            total_attempts: rec.total_attempts,
            streak: rec.streak,
            last_practice_date: rec.last_practice_date.as_deref().and_then(parse_date),
            level: Level::parse_or_default(&rec.level),
            xp: rec.xp,
        }
    }
}

impl From<&UserProfile> for StoredProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            display_name: profile.display_name.clone(),
            total_correct: profile.total_correct,
            total_attempts: profile.total_attempts,
            streak: profile.streak,
            last_practice_date: profile
                .last_practice_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            level: profile.level.label().to_string(),
            xp: profile.xp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredNote {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub updated_at: i64,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
