use crate::api::reports::error::ReportsError;
use crate::api::reports::interfaces::{
    CreateReportRequest, CreateReportResponse, ReportStatusResponse, ReportView,
};
use crate::database::{QuizResponseStore, ReportJobStore};
use crate::queue::enqueue_stage_job;
use crate::utils::nice_id;
use app_state::AppSettings;
use chrono::Duration;
use common_types::{ReportJob, ReportStatus, Stage};
use report_pipeline::ReportStore;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

/// Length of the URL-safe access token; long enough that report URLs are not
/// enumerable.
const ACCESS_TOKEN_LENGTH: usize = 32;

/// Creates the report row for an existing quiz submission and durably
/// enqueues stage 1.
#[instrument(skip(pool))]
pub async fn create_report(
    pool: &PgPool,
    request: &CreateReportRequest,
) -> Result<CreateReportResponse, ReportsError> {
    let quiz = QuizResponseStore::get(pool, request.quiz_response_id)
        .await?
        .ok_or(ReportsError::QuizResponseNotFound)?;

    let report = ReportJobStore::create(pool, quiz.id, &nice_id(ACCESS_TOKEN_LENGTH)).await?;
    enqueue_stage_job(pool, report.id, Stage::ProblemAnalysis, false, Duration::zero()).await?;
    info!("Accepted report request {} for quiz {}", report.id, quiz.id);

    Ok(CreateReportResponse {
        report_id: report.id,
    })
}

/// Progress snapshot for the website's polling loop.
#[instrument(skip(pool, settings))]
pub async fn get_status(
    pool: &PgPool,
    settings: &AppSettings,
    report_id: Uuid,
) -> Result<ReportStatusResponse, ReportsError> {
    let job = ReportJobStore::get(pool, report_id)
        .await?
        .ok_or(ReportsError::NotFound)?;
    Ok(status_response(&job, settings))
}

/// Token-gated retrieval; the token is the only credential.
#[instrument(skip(store, access_token))]
pub async fn get_report_by_token(
    store: &dyn ReportStore,
    access_token: &str,
) -> Result<ReportView, ReportsError> {
    let job = store
        .fetch_by_token(access_token)
        .await?
        .ok_or(ReportsError::NotFound)?;
    Ok(report_view(&job))
}

fn status_response(job: &ReportJob, settings: &AppSettings) -> ReportStatusResponse {
    let completed = job.status == ReportStatus::Completed;
    ReportStatusResponse {
        report_id: job.id,
        status: job.status,
        progress: job.progress(),
        current_stage: if completed {
            None
        } else {
            job.next_missing_stage().map(Stage::number)
        },
        access_token: completed.then(|| job.access_token.clone()),
        report_url: completed.then(|| settings.report_url(&job.access_token)),
        error_message: (job.status == ReportStatus::Failed)
            .then(|| "Report generation failed. We are looking into it.".to_string()),
    }
}

fn report_view(job: &ReportJob) -> ReportView {
    let report = if job.status == ReportStatus::Completed {
        job.stage4_output.clone()
    } else {
        None
    };
    ReportView {
        status: job.status,
        progress: job.progress(),
        report,
    }
}
