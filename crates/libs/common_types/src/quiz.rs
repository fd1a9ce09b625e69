use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// The originating quiz submission. Owned by the website's form handler;
/// the pipeline only ever reads it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct QuizResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub company: Option<String>,
    /// Raw answer map as submitted, shape unvalidated here.
    pub answers: Value,
    pub created_at: DateTime<Utc>,
}

/// Contact details needed by the delivery notifier.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Contact {
    pub email: String,
    pub name: String,
}
