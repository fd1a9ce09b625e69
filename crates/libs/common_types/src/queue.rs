use chrono::{DateTime, Utc};
use sqlx::Type;
use uuid::Uuid;

/// One durable unit of work: run a single pipeline stage for a report.
/// Deduplicated on `(report_id, stage)` while queued or running, so a stage
/// completion reliably triggers its successor at most once per chain pass.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StageJob {
    pub id: i64,
    pub report_id: Uuid,
    pub stage: i32,
    /// Bypass the already-have-output short-circuit (sweeper re-runs).
    pub force: bool,
    pub status: StageJobStatus,
    pub owner: Option<String>,
    pub last_error: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Type)]
#[sqlx(type_name = "stage_job_status", rename_all = "snake_case")]
pub enum StageJobStatus {
    Queued,
    Running,
    Done,
    Failed,
    Cancelled,
}
