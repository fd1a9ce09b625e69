use crate::api_state::ApiContext;
use crate::reports::handlers::{create_report_handler, report_by_token_handler, report_status_handler};
use axum::{
    Router,
    routing::{get, post},
};

pub fn reports_public_router() -> Router<ApiContext> {
    Router::new()
        .route("/reports", post(create_report_handler))
        .route("/reports/{report_id}/status", get(report_status_handler))
        .route("/reports/by-token/{access_token}", get(report_by_token_handler))
}
