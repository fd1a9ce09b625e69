use common_types::ReportStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportRequest {
    /// Quiz submission the report is generated for; must already exist.
    pub quiz_response_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportResponse {
    pub report_id: Uuid,
}

/// Polled by the website while generation runs. Provider diagnostics stay in
/// the database and logs; failures surface here as one generic message.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusResponse {
    pub report_id: Uuid,
    pub status: ReportStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_stage: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Token-gated report view. The final report body is only present once the
/// pipeline has completed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportView {
    pub status: ReportStatus,
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<Value>,
}
