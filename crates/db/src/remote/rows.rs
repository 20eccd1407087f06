//! Row shapes for the remote schema and their canonical conversions.
//!
//! Column names intentionally differ from the canonical field names where
//! the schema grew its own vocabulary (`attempted_at`/`next_review_at` on
//! `user_word_progress`, `note` on `user_notes`); the conversions here are
//! the single place that vocabulary is translated.

use chrono::NaiveDate;
use defter_core::engine::WordAttempt;
use defter_core::profile::{Level, UserProfile};
use defter_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::{
    ArchivalDocument, Difficulty, ErrorReport, ReportStatus, Role, UserAccount, WordNote,
    WordToken,
};


// ---------------------------------------------------------------------------
// documents
// ---------------------------------------------------------------------------

/// Row from the `documents` table; `words` is a JSONB array.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub difficulty: String,
    pub year: i32,
    pub image_url: String,
    pub words: serde_json::Value,
    pub created_at: Timestamp,
}

impl From<DocumentRow> for ArchivalDocument {
    fn from(row: DocumentRow) -> Self {
        // A malformed JSONB payload degrades to an empty word list rather
        // than failing the read.
        let words: Vec<WordToken> = serde_json::from_value(row.words).unwrap_or_default();
        Self {
            id: row.id,
            title: row.title,
            category: row.category,
            difficulty: Difficulty::parse_or_default(&row.difficulty),
            year: row.year,
            image_url: row.image_url,
            words,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub role: String,
    pub xp: i64,
    pub level: String,
    pub streak: i64,
    pub created_at: Timestamp,
}

impl From<UserRow> for UserAccount {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            display_name: row.display_name,
            role: Role::parse_or_default(&row.role),
            xp: row.xp,
            level: Level::parse_or_default(&row.level),
            streak: row.streak,
            created_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// error_reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct ReportRow {
    pub id: DbId,
    pub doc_id: DbId,
    pub word_id: i32,
    pub original: String,
    pub current_modern: String,
    pub suggested_modern: String,
    pub reporter_id: Option<DbId>,
    pub status: String,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

impl From<ReportRow> for ErrorReport {
    fn from(row: ReportRow) -> Self {
        Self {
            id: row.id,
            doc_id: row.doc_id,
            word_id: row.word_id,
            original: row.original,
            current_modern: row.current_modern,
            suggested_modern: row.suggested_modern,
            reporter_id: row.reporter_id,
            status: ReportStatus::parse_or_default(&row.status),
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        }
    }
}

// ---------------------------------------------------------------------------
// user_progress / user_word_progress
// ---------------------------------------------------------------------------

/// Row from `user_progress` (one per user).
#[derive(Debug, Clone, FromRow)]
pub struct ProgressRow {
    pub display_name: String,
    pub total_correct: i64,
    pub total_attempts: i64,
    pub streak: i64,
    pub last_practice_date: Option<NaiveDate>,
    pub level: String,
    pub xp: i64,
}

impl From<ProgressRow> for UserProfile {
    fn from(row: ProgressRow) -> Self {
        Self {
            display_name: row.display_name,
            total_correct: row.total_correct,
            total_attempts: row.total_attempts,
            streak: row.streak,
            last_practice_date: row.last_practice_date,
            level: Level::parse_or_default(&row.level),
            xp: row.xp,
        }
    }
}

/// Row from `user_word_progress` (one per attempt).
#[derive(Debug, Clone, FromRow)]
pub struct AttemptRow {
    pub doc_id: DbId,
    pub word_id: i32,
    pub original: String,
    pub modern: String,
    pub is_correct: bool,
    pub attempted_at: Timestamp,
    pub next_review_at: Timestamp,
}

impl From<AttemptRow> for WordAttempt {
    fn from(row: AttemptRow) -> Self {
        Self {
            doc_id: row.doc_id,
            word_id: row.word_id,
            original: row.original,
            modern: row.modern,
            is_correct: row.is_correct,
            timestamp: row.attempted_at,
            next_review_date: row.next_review_at,
        }
    }
}

// ---------------------------------------------------------------------------
// user_notes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct NoteRow {
    pub doc_id: DbId,
    pub word_id: i32,
    pub note: String,
    pub updated_at: Timestamp,
}

impl From<NoteRow> for WordNote {
    fn from(row: NoteRow) -> Self {
        Self {
            doc_id: row.doc_id,
            word_id: row.word_id,
            text: row.note,
            updated_at: row.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
