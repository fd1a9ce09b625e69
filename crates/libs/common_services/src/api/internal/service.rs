use crate::api::internal::error::InternalError;
use crate::api::internal::interfaces::TriggerResult;
use crate::database::ReportJobStore;
use crate::queue::enqueue_stage_job;
use chrono::Duration;
use common_types::Stage;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

/// Durably enqueues one stage run for a report. The worker picks it up; the
/// HTTP call never executes a stage inline.
#[instrument(skip(pool))]
pub async fn trigger_stage(
    pool: &PgPool,
    report_id: Uuid,
    stage_number: i32,
    force: bool,
) -> Result<TriggerResult, InternalError> {
    let stage =
        Stage::from_number(stage_number).ok_or(InternalError::UnknownStage(stage_number))?;
    ReportJobStore::get(pool, report_id)
        .await?
        .ok_or(InternalError::ReportNotFound)?;

    let enqueued = enqueue_stage_job(pool, report_id, stage, force, Duration::zero()).await?;
    Ok(TriggerResult { enqueued })
}
