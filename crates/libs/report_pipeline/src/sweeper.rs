use crate::context::PipelineContext;
use crate::error::StoreError;
use app_state::SweepSettings;
use chrono::{Duration, Utc};
use common_types::{ReportStatus, Stage};
use tracing::info;

/// Counters from one sweep pass, logged and returned to the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SweepOutcome {
    pub examined: usize,
    pub enqueued: usize,
    pub deduplicated: usize,
}

/// Whether a report in `status`, last touched `age` ago, should be picked up
/// by the sweeper.
///
/// Pending reports are always eligible (their kickoff never happened).
/// In-flight reports only count as stuck after `stuck_after_secs` of silence.
/// Failed reports get a cooldown before retry and age out of the retry window
/// entirely, after which only a manual forced trigger can revive them.
pub fn sweep_eligible(status: ReportStatus, age: Duration, settings: &SweepSettings) -> bool {
    match status {
        ReportStatus::Pending => true,
        ReportStatus::Processing
        | ReportStatus::Stage1Complete
        | ReportStatus::Stage2Complete
        | ReportStatus::Stage3Complete => age > Duration::seconds(settings.stuck_after_secs as i64),
        ReportStatus::Failed => {
            age >= Duration::seconds(settings.retry_cooldown_secs as i64)
                && age <= Duration::seconds(settings.retry_window_secs as i64)
        }
        ReportStatus::Completed => false,
    }
}

/// One sweep pass: find unsettled reports, filter by age policy, and enqueue
/// each one's first missing stage with `force` so the idempotency guard does
/// not short-circuit the resume.
///
/// Enqueues are staggered by `stagger_secs` per report so a batch of resumed
/// reports does not hit the model providers in one burst.
pub async fn sweep(ctx: &PipelineContext) -> Result<SweepOutcome, StoreError> {
    let settings = &ctx.settings.pipeline.sweep;
    let now = Utc::now();

    let candidates = ctx.store.unsettled(100).await?;
    let mut outcome = SweepOutcome {
        examined: candidates.len(),
        ..SweepOutcome::default()
    };

    let eligible = candidates
        .into_iter()
        .filter(|job| sweep_eligible(job.status, now - job.updated_at, settings))
        .take(settings.batch_size as usize);

    for (index, job) in eligible.enumerate() {
        let stage = job.next_missing_stage().unwrap_or(Stage::ReportGeneration);
        let delay = Duration::seconds(settings.stagger_secs as i64 * index as i64);
        if ctx.queue.enqueue(job.id, stage, true, delay).await? {
            info!(report_id = %job.id, %stage, status = ?job.status, "sweeper enqueued resume");
            outcome.enqueued += 1;
        } else {
            outcome.deduplicated += 1;
        }
    }

    info!(
        examined = outcome.examined,
        enqueued = outcome.enqueued,
        deduplicated = outcome.deduplicated,
        "sweep pass finished"
    );
    Ok(outcome)
}
