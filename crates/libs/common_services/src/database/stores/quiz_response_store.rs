use crate::database::DbError;
use common_types::{Contact, QuizResponse};
use serde_json::Value;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

/// Read-only access to quiz submissions; the website's form handler owns the
/// writes.
pub struct QuizResponseStore;

impl QuizResponseStore {
    pub async fn get(
        executor: impl Executor<'_, Database = Postgres>,
        id: Uuid,
    ) -> Result<Option<QuizResponse>, DbError> {
        Ok(
            sqlx::query_as::<_, QuizResponse>("SELECT * FROM quiz_responses WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Submitter contact details for a report, joined through `report_jobs`.
    pub async fn contact_for_report(
        executor: impl Executor<'_, Database = Postgres>,
        report_id: Uuid,
    ) -> Result<Option<Contact>, DbError> {
        Ok(sqlx::query_as::<_, Contact>(
            r#"
            SELECT q.email, q.name
            FROM report_jobs r
            JOIN quiz_responses q ON q.id = r.quiz_response_id
            WHERE r.id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(executor)
        .await?)
    }

    /// Raw quiz answers for a report, joined through `report_jobs`.
    pub async fn answers_for_report(
        executor: impl Executor<'_, Database = Postgres>,
        report_id: Uuid,
    ) -> Result<Option<Value>, DbError> {
        Ok(sqlx::query_scalar::<_, Value>(
            r#"
            SELECT q.answers
            FROM report_jobs r
            JOIN quiz_responses q ON q.id = r.quiz_response_id
            WHERE r.id = $1
            "#,
        )
        .bind(report_id)
        .fetch_optional(executor)
        .await?)
    }
}
