//! Remote error-report repository.

use async_trait::async_trait;
use defter_core::types::{DbId, Timestamp};

use crate::error::{StoreError, StoreResult};
use crate::models::{ErrorReport, NewReport, ReportStatus};
use crate::repositories::ReportRepository;
use crate::DbPool;

use super::rows::ReportRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, doc_id, word_id, original, current_modern, suggested_modern, \
                       reporter_id, status, created_at, resolved_at";

pub struct RemoteReportRepo {
    pool: DbPool,
}

impl RemoteReportRepo {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: DbId) -> StoreResult<Option<ErrorReport>> {
        let query = format!("SELECT {COLUMNS} FROM error_reports WHERE id = $1");
        let row = sqlx::query_as::<_, ReportRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ReportRepository for RemoteReportRepo {
    async fn list(&self, status: Option<ReportStatus>) -> StoreResult<Vec<ErrorReport>> {
        let rows = match status {
            Some(status) => {
                let query = format!(
                    "SELECT {COLUMNS} FROM error_reports WHERE status = $1 \
                     ORDER BY created_at DESC"
                );
                sqlx::query_as::<_, ReportRow>(&query)
                    .bind(status.as_str())
                    .fetch_all(&self.pool)
                    .await?
            }
            None => {
                let query =
                    format!("SELECT {COLUMNS} FROM error_reports ORDER BY created_at DESC");
                sqlx::query_as::<_, ReportRow>(&query)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<ErrorReport>> {
        self.fetch(id).await
    }

    async fn create(&self, input: NewReport) -> StoreResult<ErrorReport> {
        let query = format!(
            "INSERT INTO error_reports \
                 (doc_id, word_id, original, current_modern, suggested_modern, reporter_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReportRow>(&query)
            .bind(input.doc_id)
            .bind(input.word_id)
            .bind(&input.original)
            .bind(&input.current_modern)
            .bind(&input.suggested_modern)
            .bind(input.reporter_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn set_status(
        &self,
        id: DbId,
        status: ReportStatus,
        at: Timestamp,
    ) -> StoreResult<ErrorReport> {
        // The transition is validated against the current row before the
        // write; two admin tabs racing is accepted last-write-wins.
        let current = self
            .fetch(id)
            .await?
            .ok_or_else(|| StoreError::not_found("error report", id))?;
        current
            .status
            .ensure_transition(status)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        let query = format!(
            "UPDATE error_reports SET status = $2, resolved_at = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, ReportRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(status.is_terminal().then_some(at))
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("error report", id))?;
        Ok(row.into())
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        sqlx::query("DELETE FROM error_reports WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
