//! Local error-report repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use defter_core::types::{DbId, Timestamp};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::kv::{KeyValueStore, KeyValueStoreExt};
use crate::models::{ErrorReport, NewReport, ReportStatus};
use crate::repositories::ReportRepository;

use super::records::StoredReport;
use super::REPORTS_KEY;

pub struct LocalReportRepo {
    store: Arc<dyn KeyValueStore>,
}

impl LocalReportRepo {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn load(&self) -> Vec<ErrorReport> {
        self.store
            .get_or::<Vec<StoredReport>>(REPORTS_KEY, Vec::new())
            .into_iter()
            .map(Into::into)
            .collect()
    }

    fn save(&self, reports: &[ErrorReport]) -> StoreResult<()> {
        let records: Vec<StoredReport> = reports.iter().map(Into::into).collect();
        self.store.set(REPORTS_KEY, &records)
    }
}

#[async_trait]
impl ReportRepository for LocalReportRepo {
    async fn list(&self, status: Option<ReportStatus>) -> StoreResult<Vec<ErrorReport>> {
        let mut reports: Vec<_> = self
            .load()
            .into_iter()
            .filter(|r| status.map_or(true, |s| s == r.status))
            .collect();
        reports.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reports)
    }

    async fn get(&self, id: DbId) -> StoreResult<Option<ErrorReport>> {
        Ok(self.load().into_iter().find(|r| r.id == id))
    }

    async fn create(&self, input: NewReport) -> StoreResult<ErrorReport> {
        let report = ErrorReport {
            id: Uuid::now_v7(),
            doc_id: input.doc_id,
            word_id: input.word_id,
            original: input.original,
            current_modern: input.current_modern,
            suggested_modern: input.suggested_modern,
            reporter_id: input.reporter_id,
            status: ReportStatus::Pending,
            created_at: Utc::now(),
            resolved_at: None,
        };
        let mut reports = self.load();
        reports.push(report.clone());
        self.save(&reports)?;
        Ok(report)
    }

    async fn set_status(
        &self,
        id: DbId,
        status: ReportStatus,
        at: Timestamp,
    ) -> StoreResult<ErrorReport> {
        let mut reports = self.load();
        let report = reports
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::not_found("error report", id))?;

        report
            .status
            .ensure_transition(status)
            .map_err(|e| StoreError::Validation(e.to_string()))?;

        report.status = status;
        if status.is_terminal() {
            report.resolved_at = Some(at);
        }
        let updated = report.clone();
        self.save(&reports)?;
        Ok(updated)
    }

    async fn delete(&self, id: DbId) -> StoreResult<()> {
        let mut reports = self.load();
        let before = reports.len();
        reports.retain(|r| r.id != id);
        if reports.len() != before {
            self.save(&reports)?;
        }
        Ok(())
    }
}
