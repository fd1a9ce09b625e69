use crate::context::WorkerContext;
use app_state::StageTable;
use color_eyre::{Report, Result};
use common_services::alert;
use common_types::StageJob;
use report_pipeline::StageOutcome;
use sqlx::PgPool;
use tracing::{info, warn};

/// Slack on top of the longest configured provider timeout before a `running`
/// claim counts as orphaned. Reclaiming any sooner can start a second
/// provider call for the same stage while the first is still in flight.
const STALE_CLAIM_HEADROOM_SECONDS: u64 = 120;

/// Age after which a `running` row may be taken over, derived from the
/// slowest stage's `timeout_secs` so a live worker always outlasts it.
fn stale_claim_seconds(stages: &StageTable) -> f64 {
    let longest = [&stages.stage1, &stages.stage2, &stages.stage3, &stages.stage4]
        .into_iter()
        .map(|stage| stage.timeout_secs)
        .max()
        .unwrap_or(0);
    (longest + STALE_CLAIM_HEADROOM_SECONDS) as f64
}

/// Atomically claims the next available stage job from the queue.
///
/// # Errors
///
/// Returns an error if the database transaction fails.
pub async fn claim_next_job(context: &WorkerContext) -> Result<Option<StageJob>> {
    let mut tx = context.pool.begin().await?;

    let job = sqlx::query_as::<_, StageJob>(
        r#"
        WITH candidate AS (
            SELECT id FROM stage_jobs
            WHERE (status = 'queued' AND scheduled_at <= now())
               OR (status = 'running' AND started_at < now() - interval '1 second' * $2)
            ORDER BY scheduled_at, created_at
            FOR UPDATE SKIP LOCKED
            LIMIT 1
        )
        UPDATE stage_jobs
        SET status = 'running',
            owner = $1,
            started_at = now()
        WHERE id = (SELECT id FROM candidate)
        RETURNING *
        "#,
    )
    .bind(&context.worker_id)
    .bind(stale_claim_seconds(
        &context.pipeline.settings.pipeline.stages,
    ))
    .fetch_optional(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(job)
}

/// Settles a claimed queue row after its stage ran.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn update_job_on_completion(
    pool: &PgPool,
    job: &StageJob,
    outcome: StageOutcome,
) -> Result<()> {
    if outcome == StageOutcome::Skipped {
        info!("Stage {} for report {} was already done.", job.stage, job.report_id);
    }
    sqlx::query("UPDATE stage_jobs SET status = 'done', finished_at = now() WHERE id = $1")
        .bind(job.id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Marks a claimed queue row as failed. Queue rows are single-shot; the
/// report-level sweeper is the only retry path.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub async fn update_job_on_failure(pool: &PgPool, job: &StageJob, error: &Report) -> Result<()> {
    let error_string = format!("{error:?}");
    alert!(
        "‼️ Stage {} for report {} failed: {}",
        job.stage,
        job.report_id,
        error_string
    );
    sqlx::query(
        "UPDATE stage_jobs SET status = 'failed', finished_at = now(), last_error = $2 WHERE id = $1",
    )
    .bind(job.id)
    .bind(&error_string)
    .execute(pool)
    .await?;
    Ok(())
}
