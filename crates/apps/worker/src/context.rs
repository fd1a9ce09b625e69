use app_state::AppSettings;
use common_services::database::PgReportStore;
use common_services::email_client::EmailClient;
use common_services::queue::PgStageQueue;
use report_pipeline::{ModelRouter, PipelineContext};
use sqlx::PgPool;
use std::sync::Arc;

pub struct WorkerContext {
    pub worker_id: String,
    pub pool: PgPool,
    pub pipeline: PipelineContext,
}

impl WorkerContext {
    #[must_use]
    pub fn new(pool: PgPool, settings: AppSettings, worker_id: String) -> Self {
        let pipeline = PipelineContext::new(
            settings.clone(),
            Arc::new(PgReportStore::new(pool.clone())),
            Arc::new(PgStageQueue::new(pool.clone())),
            ModelRouter::from_settings(&settings),
            Arc::new(EmailClient::new(
                &settings.pipeline.email.base_url,
                &settings.secrets.email_api_key,
                &settings.pipeline.email.from,
            )),
        );
        Self {
            worker_id,
            pool,
            pipeline,
        }
    }
}
