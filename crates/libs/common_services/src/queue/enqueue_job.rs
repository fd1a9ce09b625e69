use crate::database::DbError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use common_types::Stage;
use report_pipeline::{StageQueue, StoreError};
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

/// Enqueues one stage run for a report.
///
/// Returns `false` when an equivalent job is already queued or running; the
/// conflict target must match the partial unique index on `stage_jobs`
/// exactly.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub async fn enqueue_stage_job(
    pool: &PgPool,
    report_id: Uuid,
    stage: Stage,
    force: bool,
    delay: Duration,
) -> Result<bool, DbError> {
    let scheduled_at = Utc::now() + delay;

    let result = sqlx::query(
        r#"
        INSERT INTO stage_jobs (report_id, stage, force, scheduled_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (report_id, stage)
        WHERE (status IN ('queued', 'running'))
        DO NOTHING
        "#,
    )
    .bind(report_id)
    .bind(stage.number())
    .bind(force)
    .bind(scheduled_at)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        warn!(
            "Not enqueueing {} for report {}, an active one already exists.",
            stage, report_id
        );
        return Ok(false);
    }

    info!(
        "Enqueued {} for report {}, force: {}, scheduled_at: {}",
        stage, report_id, force, scheduled_at
    );
    Ok(true)
}

/// Postgres-backed [`StageQueue`].
#[derive(Clone)]
pub struct PgStageQueue {
    pool: PgPool,
}

impl PgStageQueue {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StageQueue for PgStageQueue {
    async fn enqueue(
        &self,
        report_id: Uuid,
        stage: Stage,
        force: bool,
        delay: Duration,
    ) -> Result<bool, StoreError> {
        Ok(enqueue_stage_job(&self.pool, report_id, stage, force, delay).await?)
    }
}
