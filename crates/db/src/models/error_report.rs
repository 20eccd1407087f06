//! Crowd-sourced correction reports.

use defter_core::error::CoreError;
use defter_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};

/// Review state of a report. Transitions are monotonic: `Pending` may move
/// to any other state, `Reviewed` only onward to a terminal state, and
/// `Accepted`/`Rejected` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Reviewed,
    Accepted,
    Rejected,
}

impl ReportStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    pub fn parse_or_default(s: &str) -> Self {
        match s {
            "reviewed" => Self::Reviewed,
            "accepted" => Self::Accepted,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }

    /// Validate a status transition.
    pub fn ensure_transition(self, next: ReportStatus) -> Result<(), CoreError> {
        let allowed = match self {
            Self::Pending => next != Self::Pending,
            Self::Reviewed => next.is_terminal(),
            Self::Accepted | Self::Rejected => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot move report from {} to {}",
                self.as_str(),
                next.as_str()
            )))
        }
    }
}

/// Canonical report shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub id: DbId,
    pub doc_id: DbId,
    pub word_id: i32,
    /// Source-script form the report refers to.
    pub original: String,
    /// Transliteration currently shown in the document.
    pub current_modern: String,
    /// The reporter's suggested correction.
    pub suggested_modern: String,
    pub reporter_id: Option<DbId>,
    pub status: ReportStatus,
    pub created_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// DTO for filing a report.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReport {
    pub doc_id: DbId,
    pub word_id: i32,
    pub original: String,
    pub current_modern: String,
    pub suggested_modern: String,
    #[serde(default)]
    pub reporter_id: Option<DbId>,
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pending_can_move_anywhere_forward() {
        for next in [ReportStatus::Reviewed, ReportStatus::Accepted, ReportStatus::Rejected] {
            assert!(ReportStatus::Pending.ensure_transition(next).is_ok());
        }
    }

    #[test]
    fn reviewed_only_reaches_terminal_states() {
        assert!(ReportStatus::Reviewed.ensure_transition(ReportStatus::Accepted).is_ok());
        assert!(ReportStatus::Reviewed.ensure_transition(ReportStatus::Rejected).is_ok());
        assert_matches!(
            ReportStatus::Reviewed.ensure_transition(ReportStatus::Pending),
            Err(CoreError::Conflict(_))
        );
    }

    #[test]
    fn terminal_states_are_final() {
        for from in [ReportStatus::Accepted, ReportStatus::Rejected] {
            for next in [
                ReportStatus::Pending,
                ReportStatus::Reviewed,
                ReportStatus::Accepted,
                ReportStatus::Rejected,
            ] {
                assert_matches!(from.ensure_transition(next), Err(CoreError::Conflict(_)));
            }
        }
    }
}
