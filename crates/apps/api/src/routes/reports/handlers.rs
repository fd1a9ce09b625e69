use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use common_services::api::reports::error::ReportsError;
use common_services::api::reports::interfaces::CreateReportRequest;
use common_services::api::reports::service::{create_report, get_report_by_token, get_status};
use tracing::instrument;
use uuid::Uuid;

#[instrument(skip(context), err(Debug))]
pub async fn create_report_handler(
    State(context): State<ApiContext>,
    Json(request): Json<CreateReportRequest>,
) -> Result<impl IntoResponse, ReportsError> {
    let response = create_report(&context.pool, &request).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

#[instrument(skip(context), err(Debug))]
pub async fn report_status_handler(
    State(context): State<ApiContext>,
    Path(report_id): Path<Uuid>,
) -> Result<impl IntoResponse, ReportsError> {
    let response = get_status(&context.pool, &context.settings, report_id).await?;
    Ok(Json(response))
}

#[instrument(skip(context, access_token), err(Debug))]
pub async fn report_by_token_handler(
    State(context): State<ApiContext>,
    Path(access_token): Path<String>,
) -> Result<impl IntoResponse, ReportsError> {
    let response = get_report_by_token(context.pipeline.store.as_ref(), &access_token).await?;
    Ok(Json(response))
}
