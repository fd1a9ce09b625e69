use crate::database::DbError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use report_pipeline::StoreError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ReportsError {
    #[error("Database error")]
    Database(#[from] DbError),

    #[error("Store error")]
    Store(#[from] StoreError),

    #[error("Report not found")]
    NotFound,

    #[error("Quiz response not found")]
    QuizResponseNotFound,
}

impl IntoResponse for ReportsError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Database(e) => {
                error!("Reports database error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_string(),
                )
            }
            Self::Store(e) => {
                error!("Reports store error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.".to_string(),
                )
            }
            Self::NotFound => (StatusCode::NOT_FOUND, "Report not found.".to_string()),
            Self::QuizResponseNotFound => (
                StatusCode::NOT_FOUND,
                "Quiz response not found.".to_string(),
            ),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
