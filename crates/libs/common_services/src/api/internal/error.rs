use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use report_pipeline::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum InternalError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Unknown stage: {0}")]
    UnknownStage(i32),

    #[error("Report not found")]
    ReportNotFound,

    #[error("Database error")]
    Database(#[from] DbError),

    #[error("internal error")]
    Store(#[from] StoreError),
}

impl IntoResponse for InternalError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized.".to_string()),
            Self::UnknownStage(n) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("Unknown stage {n}, expected 1-4."),
            ),
            Self::ReportNotFound => (StatusCode::NOT_FOUND, "Report not found.".to_string()),
            Self::Database(e) => {
                error!("Internal route database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_string(),
                )
            }
            Self::Store(e) => {
                error!("Internal route store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
