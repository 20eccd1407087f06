//! User account entity and DTOs.
//!
//! Authentication secrets (password hashing, sessions) are out of scope;
//! accounts carry only identity, role, and gamification aggregates.

use defter_core::profile::Level;
use defter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Learner,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Learner => "learner",
            Self::Admin => "admin",
        }
    }

    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Learner,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::Learner
    }
}

/// Canonical account shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: DbId,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    /// Gamification aggregates, denormalized from the learning profile for
    /// the leaderboard.
    pub xp: i64,
    pub level: Level,
    pub streak: i64,
    pub created_at: Timestamp,
}

/// DTO for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Role,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub display_name: Option<String>,
    pub role: Option<Role>,
}
