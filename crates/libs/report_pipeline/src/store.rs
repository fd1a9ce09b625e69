use crate::error::StoreError;
use async_trait::async_trait;
use chrono::Duration;
use common_types::{Contact, ReportJob, ReportStatus, Stage};
use serde_json::Value;
use uuid::Uuid;

/// Persistence seam for report jobs. The Postgres implementation lives in
/// `common_services`; tests run against an in-memory stub.
///
/// Every mutating call that takes `expected_version` is a compare-and-swap:
/// it must fail with [`StoreError::VersionConflict`] when the row's version
/// no longer matches, so concurrent stage invocations cannot clobber each
/// other's output.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn fetch(&self, report_id: Uuid) -> Result<ReportJob, StoreError>;

    /// Token-keyed lookup backing the public retrieval endpoint. The token is
    /// unique, so at most one job matches.
    async fn fetch_by_token(&self, access_token: &str) -> Result<Option<ReportJob>, StoreError>;

    /// CAS status write; returns the refreshed row (version bumped).
    async fn set_status(
        &self,
        report_id: Uuid,
        expected_version: i32,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError>;

    /// CAS write of one stage's output blob together with the new status.
    async fn save_stage_output(
        &self,
        report_id: Uuid,
        expected_version: i32,
        stage: Stage,
        output: &Value,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError>;

    /// Terminal failure bookkeeping. Not a CAS: a failure must be recorded
    /// even if the version moved, but a `completed` row is never demoted.
    async fn mark_failed(
        &self,
        report_id: Uuid,
        stage: Stage,
        message: &str,
    ) -> Result<(), StoreError>;

    async fn mark_email_sent(&self, report_id: Uuid) -> Result<(), StoreError>;

    /// Contact details of the submitter, joined from the quiz response.
    async fn contact(&self, report_id: Uuid) -> Result<Contact, StoreError>;

    /// Raw quiz answers of the originating submission (stage 1 input).
    async fn quiz_answers(&self, report_id: Uuid) -> Result<Value, StoreError>;

    /// Rows in `pending`, `processing`-adjacent, or `failed` states, oldest
    /// first. Age-based eligibility is the sweeper's concern, not the store's.
    async fn unsettled(&self, limit: i64) -> Result<Vec<ReportJob>, StoreError>;
}

/// Durable hand-off between stages: stage N's completion enqueues stage N+1
/// instead of firing an unawaited HTTP call.
#[async_trait]
pub trait StageQueue: Send + Sync {
    /// Enqueue one stage run. Returns `false` when an equivalent job is
    /// already queued or running (dedup on `(report_id, stage)`).
    async fn enqueue(
        &self,
        report_id: Uuid,
        stage: Stage,
        force: bool,
        delay: Duration,
    ) -> Result<bool, StoreError>;
}
