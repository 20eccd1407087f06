//! Archival document entity and DTOs.

use defter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Reading difficulty of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Lenient parse used when normalizing stored values; anything
    /// unrecognized defaults to `Beginner` rather than failing the read.
    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "intermediate" => Self::Intermediate,
            "advanced" => Self::Advanced,
            _ => Self::Beginner,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Beginner
    }
}

/// Position of a word on the document image, as percentages of the image
/// width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WordCoords {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// One learnable token inside a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordToken {
    /// Position-stable id within the document.
    pub id: i32,
    /// Source-script (Ottoman) form.
    pub original: String,
    /// Latinized form.
    pub modern: String,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub coords: Option<WordCoords>,
}

/// Canonical document shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchivalDocument {
    pub id: DbId,
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub year: i32,
    pub image_url: String,
    /// Ordered word tokens; order is the reading order.
    pub words: Vec<WordToken>,
    pub created_at: Timestamp,
}

/// DTO for creating a document (the backend assigns the id).
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub year: i32,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub words: Vec<WordToken>,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    pub words: Option<Vec<WordToken>>,
}

/// Equality filters for document listing. Both backends apply identical
/// semantics: remote pushes them into the query, local filters in memory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentFilter {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub year: Option<i32>,
}

impl DocumentFilter {
    pub fn matches(&self, doc: &ArchivalDocument) -> bool {
        self.category.as_deref().map_or(true, |c| c == doc.category)
            && self.difficulty.map_or(true, |d| d == doc.difficulty)
            && self.year.map_or(true, |y| y == doc.year)
    }
}
