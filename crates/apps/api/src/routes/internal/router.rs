use crate::api_state::ApiContext;
use crate::internal::handlers::{sweep_handler, trigger_stage_handler};
use axum::{Router, routing::post};

pub fn internal_router() -> Router<ApiContext> {
    Router::new()
        .route(
            "/internal/reports/{report_id}/stages/{stage}",
            post(trigger_stage_handler),
        )
        .route("/internal/sweep", post(sweep_handler))
}
