use app_state::AppSettings;
use color_eyre::Result;
use common_services::database::PgReportStore;
use common_services::email_client::EmailClient;
use common_services::queue::PgStageQueue;
use report_pipeline::{sweep, ModelRouter, PipelineContext};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;

/// One-shot maintenance pass, meant to run from cron.
pub async fn run_tasks(pool: PgPool, settings: AppSettings) -> Result<()> {
    let pipeline = PipelineContext::new(
        settings.clone(),
        Arc::new(PgReportStore::new(pool.clone())),
        Arc::new(PgStageQueue::new(pool)),
        ModelRouter::from_settings(&settings),
        Arc::new(EmailClient::new(
            &settings.pipeline.email.base_url,
            &settings.secrets.email_api_key,
            &settings.pipeline.email.from,
        )),
    );

    info!("🧹 Sweeping for unsettled reports");
    let outcome = sweep(&pipeline).await?;
    info!(
        "🧹 Sweep done: examined {}, enqueued {}, deduplicated {}",
        outcome.examined, outcome.enqueued, outcome.deduplicated
    );

    Ok(())
}
