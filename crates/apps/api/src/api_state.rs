use app_state::AppSettings;
use axum::extract::FromRef;
use report_pipeline::PipelineContext;
use sqlx::PgPool;

#[derive(Clone)]
pub struct ApiContext {
    pub pool: PgPool,
    pub settings: AppSettings,
    /// Shared pipeline wiring; the sweep route runs a pass through it.
    pub pipeline: PipelineContext,
}

// These impls allow Axum to extract parts of the state, for handlers that
// only need one piece of it.
impl FromRef<ApiContext> for PgPool {
    fn from_ref(state: &ApiContext) -> Self {
        state.pool.clone()
    }
}

impl FromRef<ApiContext> for AppSettings {
    fn from_ref(state: &ApiContext) -> Self {
        state.settings.clone()
    }
}
