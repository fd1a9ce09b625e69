use crate::api_state::ApiContext;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use common_services::api::auth::secrets_match;
use common_services::api::internal::error::InternalError;
use common_services::api::internal::interfaces::StageTriggerParams;
use common_services::api::internal::service::trigger_stage;
use report_pipeline::sweep;
use tracing::instrument;
use uuid::Uuid;

const INTERNAL_SECRET_HEADER: &str = "x-internal-secret";

#[instrument(skip(context, headers), err(Debug))]
pub async fn trigger_stage_handler(
    State(context): State<ApiContext>,
    Path((report_id, stage)): Path<(Uuid, i32)>,
    Query(params): Query<StageTriggerParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, InternalError> {
    require_internal_secret(&headers, &context)?;
    let result = trigger_stage(&context.pool, report_id, stage, params.force).await?;
    let status = if result.enqueued {
        StatusCode::ACCEPTED
    } else {
        StatusCode::CONFLICT
    };
    Ok((status, Json(result)))
}

#[instrument(skip(context, authorization), err(Debug))]
pub async fn sweep_handler(
    State(context): State<ApiContext>,
    TypedHeader(authorization): TypedHeader<Authorization<Bearer>>,
) -> Result<impl IntoResponse, InternalError> {
    if !secrets_match(authorization.token(), &context.settings.secrets.cron_secret) {
        return Err(InternalError::Unauthorized);
    }
    let outcome = sweep(&context.pipeline).await?;
    Ok(Json(outcome))
}

fn require_internal_secret(headers: &HeaderMap, context: &ApiContext) -> Result<(), InternalError> {
    let provided = headers
        .get(INTERNAL_SECRET_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if secrets_match(provided, &context.settings.secrets.internal_secret) {
        Ok(())
    } else {
        Err(InternalError::Unauthorized)
    }
}
