use crate::context::WorkerContext;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use common_types::{Stage, StageJob};
use report_pipeline::{StageOutcome, execute_stage};

/// Runs the stage a claimed queue row points at.
///
/// Stage failures are already recorded on the report row by `execute_stage`;
/// the error returned here only settles the queue row itself.
pub async fn handle_job(context: &WorkerContext, job: &StageJob) -> Result<StageOutcome> {
    let stage = Stage::from_number(job.stage)
        .ok_or_else(|| eyre!("Queue row {} has unknown stage {}", job.id, job.stage))?;

    let outcome = execute_stage(&context.pipeline, job.report_id, stage, job.force).await?;
    Ok(outcome)
}
