use crate::context::PipelineContext;
use crate::error::{StageError, StoreError};
use crate::notifier::render_report_email;
use crate::parse::parse_model_json;
use crate::prompts::{
    build_stage1_prompt, build_stage2_prompt, build_stage3_prompt, build_stage4_prompt,
};
use app_state::StageModelSettings;
use common_types::report::{ReportJob, ReportStatus, Stage};
use common_types::stage_output::{CuratedTools, FinalReport, ProblemAnalysis, ToolResearch};
use language_model::CompletionRequest;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use uuid::Uuid;

/// What a single stage invocation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage ran its model call and persisted fresh output.
    Completed,
    /// Output already existed and `force` was not set, nothing was done.
    Skipped,
}

/// Run one pipeline stage for a report and record the result.
///
/// Every failure except a lost optimistic-concurrency race is written back
/// to the report row before the error is returned, so the sweeper and the
/// status endpoint always see an accurate picture.
pub async fn execute_stage(
    ctx: &PipelineContext,
    report_id: Uuid,
    stage: Stage,
    force: bool,
) -> Result<StageOutcome, StageError> {
    match run_stage(ctx, report_id, stage, force).await {
        Ok(outcome) => Ok(outcome),
        Err(err) if err.is_lost_race() => {
            warn!(%report_id, %stage, error = %err, "lost concurrency race, another run owns this report");
            Err(err)
        }
        Err(err) => {
            let message = err.to_string();
            if let Err(mark_err) = ctx.store.mark_failed(report_id, stage, &message).await {
                warn!(%report_id, %stage, error = %mark_err, "could not record stage failure");
            }
            Err(err)
        }
    }
}

async fn run_stage(
    ctx: &PipelineContext,
    report_id: Uuid,
    stage: Stage,
    force: bool,
) -> Result<StageOutcome, StageError> {
    let mut job = ctx.store.fetch(report_id).await?;

    if !force && job.stage_output(stage).is_some() {
        info!(%report_id, %stage, "output already present, skipping");
        return Ok(StageOutcome::Skipped);
    }
    if !job.prerequisites_met(stage) {
        let missing = job
            .next_missing_stage()
            .map(|s| s.number())
            .unwrap_or(stage.number());
        return Err(StageError::PrerequisiteMissing { stage, missing });
    }

    let target = stage.completion_status();
    if !job.status.can_transition(target) && job.status != ReportStatus::Processing {
        if !job.status.can_transition(ReportStatus::Processing) {
            return Err(StoreError::InvalidTransition {
                report_id,
                from: job.status,
                to: ReportStatus::Processing,
            }
            .into());
        }
        job = ctx
            .store
            .set_status(report_id, job.version, ReportStatus::Processing)
            .await?;
    }

    let prompt = match stage {
        Stage::ProblemAnalysis => {
            let answers = ctx.store.quiz_answers(report_id).await?;
            build_stage1_prompt(&answers)
        }
        Stage::ToolResearch => build_stage2_prompt(required_input(&job, Stage::ProblemAnalysis, stage)?),
        Stage::ToolCuration => build_stage3_prompt(
            required_input(&job, Stage::ProblemAnalysis, stage)?,
            required_input(&job, Stage::ToolResearch, stage)?,
        ),
        Stage::ReportGeneration => build_stage4_prompt(
            required_input(&job, Stage::ProblemAnalysis, stage)?,
            required_input(&job, Stage::ToolCuration, stage)?,
        ),
    };

    let model = ctx.settings.stage_model(stage);
    let client = ctx.models.for_kind(model.provider);
    info!(%report_id, %stage, model = %model.model, provider = client.name(), "calling model");
    let completion = client
        .complete(&completion_request(model, prompt))
        .await
        .map_err(|source| StageError::Provider { stage, source })?;

    let output = parse_model_json(&completion.content).map_err(|err| {
        StageError::MalformedResponse {
            stage,
            detail: err.to_string(),
            raw: err.raw,
        }
    })?;
    validate_stage_output(stage, &output).map_err(|detail| StageError::MalformedResponse {
        stage,
        detail,
        raw: completion.content.clone(),
    })?;

    let job = ctx
        .store
        .save_stage_output(report_id, job.version, stage, &output, target)
        .await?;

    match stage.next() {
        Some(next) => {
            let enqueued = ctx
                .queue
                .enqueue(report_id, next, force, chrono::Duration::zero())
                .await?;
            if !enqueued {
                info!(%report_id, %next, "next stage already queued");
            }
        }
        None => deliver(ctx, &job).await,
    }

    Ok(StageOutcome::Completed)
}

/// Send the delivery email for a completed report. A notification failure is
/// logged but never fails the pipeline, the report stays retrievable by URL.
async fn deliver(ctx: &PipelineContext, job: &ReportJob) {
    let contact = match ctx.store.contact(job.id).await {
        Ok(contact) => contact,
        Err(err) => {
            warn!(report_id = %job.id, error = %err, "no contact for delivery email");
            return;
        }
    };
    let email = render_report_email(&contact, &ctx.settings.report_url(&job.access_token));
    match ctx.notifier.notify(&email).await {
        Ok(()) => {
            info!(report_id = %job.id, to = %email.to, "delivery email sent");
            if let Err(err) = ctx.store.mark_email_sent(job.id).await {
                warn!(report_id = %job.id, error = %err, "could not record email_sent_at");
            }
        }
        Err(err) => {
            warn!(report_id = %job.id, error = %err, "delivery email failed, report remains available");
        }
    }
}

fn required_input(job: &ReportJob, input: Stage, stage: Stage) -> Result<&Value, StageError> {
    job.stage_output(input).ok_or(StageError::PrerequisiteMissing {
        stage,
        missing: input.number(),
    })
}

fn completion_request(model: &StageModelSettings, prompt: String) -> CompletionRequest {
    CompletionRequest {
        prompt,
        model: model.model.clone(),
        temperature: model.temperature,
        max_tokens: model.max_tokens,
        reasoning_effort: model.reasoning_effort.clone(),
        verbosity: model.verbosity.clone(),
        timeout: Duration::from_secs(model.timeout_secs),
    }
}

/// Reject model output that parses as JSON but does not fit the stage schema.
fn validate_stage_output(stage: Stage, output: &Value) -> Result<(), String> {
    let result = match stage {
        Stage::ProblemAnalysis => {
            serde_json::from_value::<ProblemAnalysis>(output.clone()).map(drop)
        }
        Stage::ToolResearch => serde_json::from_value::<ToolResearch>(output.clone()).map(drop),
        Stage::ToolCuration => serde_json::from_value::<CuratedTools>(output.clone()).map(drop),
        Stage::ReportGeneration => serde_json::from_value::<FinalReport>(output.clone()).map(drop),
    };
    result.map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_schemas_reject_wrong_shapes() {
        let not_an_analysis = json!({ "opportunities": "many" });
        assert!(validate_stage_output(Stage::ProblemAnalysis, &not_an_analysis).is_err());

        let analysis = json!({
            "businessContext": "small retailer",
            "opportunities": [{
                "title": "Manual invoicing",
                "estimatedMonthlyCost": 1200.0,
                "severity": "high",
                "aiSolutionCategory": "document automation"
            }]
        });
        assert!(validate_stage_output(Stage::ProblemAnalysis, &analysis).is_ok());
    }

    #[test]
    fn curated_tools_schema_accepts_minimal_shortlist() {
        let curated = json!({
            "shortlist": [{ "name": "InvoiceBot", "monthlyInvestment": 500.0 }],
            "roadmap": []
        });
        assert!(validate_stage_output(Stage::ToolCuration, &curated).is_ok());
    }
}
