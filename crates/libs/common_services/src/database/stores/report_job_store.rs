use crate::database::DbError;
use crate::database::stores::QuizResponseStore;
use async_trait::async_trait;
use common_types::{Contact, ReportJob, ReportStatus, Stage};
use report_pipeline::{ReportStore, StoreError};
use serde_json::Value;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

pub struct ReportJobStore;

impl ReportJobStore {
    /// Creates the report row for a fresh quiz submission.
    pub async fn create(
        executor: impl Executor<'_, Database = Postgres>,
        quiz_response_id: Uuid,
        access_token: &str,
    ) -> Result<ReportJob, DbError> {
        Ok(sqlx::query_as::<_, ReportJob>(
            r#"
            INSERT INTO report_jobs (quiz_response_id, access_token)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(quiz_response_id)
        .bind(access_token)
        .fetch_one(executor)
        .await?)
    }

    pub async fn get(
        executor: impl Executor<'_, Database = Postgres>,
        id: Uuid,
    ) -> Result<Option<ReportJob>, DbError> {
        Ok(
            sqlx::query_as::<_, ReportJob>("SELECT * FROM report_jobs WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Unauthenticated lookup path: the token is the only credential.
    pub async fn get_by_token(
        executor: impl Executor<'_, Database = Postgres>,
        access_token: &str,
    ) -> Result<Option<ReportJob>, DbError> {
        Ok(
            sqlx::query_as::<_, ReportJob>("SELECT * FROM report_jobs WHERE access_token = $1")
                .bind(access_token)
                .fetch_optional(executor)
                .await?,
        )
    }

    /// Every report that has not reached `completed`, oldest touched first.
    pub async fn unsettled(
        executor: impl Executor<'_, Database = Postgres>,
        limit: i64,
    ) -> Result<Vec<ReportJob>, DbError> {
        Ok(sqlx::query_as::<_, ReportJob>(
            r#"
            SELECT * FROM report_jobs
            WHERE status <> 'completed'
            ORDER BY updated_at
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(executor)
        .await?)
    }

    /// Records a terminal failure. Completed reports are never demoted.
    pub async fn mark_failed(
        executor: impl Executor<'_, Database = Postgres>,
        id: Uuid,
        failed_at_stage: i32,
        error_message: &str,
    ) -> Result<(), DbError> {
        sqlx::query(
            r#"
            UPDATE report_jobs
            SET status = 'failed',
                failed_at_stage = $2,
                error_message = $3,
                version = version + 1,
                updated_at = now()
            WHERE id = $1 AND status <> 'completed'
            "#,
        )
        .bind(id)
        .bind(failed_at_stage)
        .bind(error_message)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn mark_email_sent(
        executor: impl Executor<'_, Database = Postgres>,
        id: Uuid,
    ) -> Result<(), DbError> {
        sqlx::query("UPDATE report_jobs SET email_sent_at = now(), updated_at = now() WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}

/// Postgres-backed [`ReportStore`]. Version checks run inside a transaction
/// with the row locked, so two workers racing on the same report cannot both
/// win the compare-and-swap.
#[derive(Clone)]
pub struct PgReportStore {
    pool: PgPool,
}

impl PgReportStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn cas_update(
        &self,
        report_id: Uuid,
        expected_version: i32,
        set_output: Option<(Stage, &Value)>,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError> {
        let mut tx = self.pool.begin().await.map_err(DbError::from)?;

        let current = sqlx::query_as::<_, ReportJob>(
            "SELECT * FROM report_jobs WHERE id = $1 FOR UPDATE",
        )
        .bind(report_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DbError::from)?
        .ok_or(StoreError::NotFound(report_id))?;

        if current.version != expected_version {
            return Err(StoreError::VersionConflict {
                report_id,
                expected: expected_version,
            });
        }
        if !current.status.can_transition(status) {
            return Err(StoreError::InvalidTransition {
                report_id,
                from: current.status,
                to: status,
            });
        }

        let output_column = set_output.map(|(stage, _)| match stage {
            Stage::ProblemAnalysis => "stage1_output",
            Stage::ToolResearch => "stage2_output",
            Stage::ToolCuration => "stage3_output",
            Stage::ReportGeneration => "stage4_output",
        });
        let sql = match output_column {
            Some(column) => format!(
                r#"
                UPDATE report_jobs
                SET {column} = $3, status = $4, version = version + 1, updated_at = now()
                WHERE id = $1 AND version = $2
                RETURNING *
                "#
            ),
            None => r#"
                UPDATE report_jobs
                SET status = $3, version = version + 1, updated_at = now()
                WHERE id = $1 AND version = $2
                RETURNING *
                "#
            .to_string(),
        };

        let mut query = sqlx::query_as::<_, ReportJob>(&sql)
            .bind(report_id)
            .bind(expected_version);
        if let Some((_, output)) = set_output {
            query = query.bind(output);
        }
        let updated = query
            .bind(status)
            .fetch_one(&mut *tx)
            .await
            .map_err(DbError::from)?;

        tx.commit().await.map_err(DbError::from)?;
        Ok(updated)
    }
}

#[async_trait]
impl ReportStore for PgReportStore {
    async fn fetch(&self, report_id: Uuid) -> Result<ReportJob, StoreError> {
        ReportJobStore::get(&self.pool, report_id)
            .await?
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn fetch_by_token(&self, access_token: &str) -> Result<Option<ReportJob>, StoreError> {
        Ok(ReportJobStore::get_by_token(&self.pool, access_token).await?)
    }

    async fn set_status(
        &self,
        report_id: Uuid,
        expected_version: i32,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError> {
        self.cas_update(report_id, expected_version, None, status)
            .await
    }

    async fn save_stage_output(
        &self,
        report_id: Uuid,
        expected_version: i32,
        stage: Stage,
        output: &Value,
        status: ReportStatus,
    ) -> Result<ReportJob, StoreError> {
        self.cas_update(report_id, expected_version, Some((stage, output)), status)
            .await
    }

    async fn mark_failed(
        &self,
        report_id: Uuid,
        stage: Stage,
        message: &str,
    ) -> Result<(), StoreError> {
        Ok(ReportJobStore::mark_failed(&self.pool, report_id, stage.number(), message).await?)
    }

    async fn mark_email_sent(&self, report_id: Uuid) -> Result<(), StoreError> {
        Ok(ReportJobStore::mark_email_sent(&self.pool, report_id).await?)
    }

    async fn contact(&self, report_id: Uuid) -> Result<Contact, StoreError> {
        QuizResponseStore::contact_for_report(&self.pool, report_id)
            .await?
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn quiz_answers(&self, report_id: Uuid) -> Result<Value, StoreError> {
        QuizResponseStore::answers_for_report(&self.pool, report_id)
            .await?
            .ok_or(StoreError::NotFound(report_id))
    }

    async fn unsettled(&self, limit: i64) -> Result<Vec<ReportJob>, StoreError> {
        Ok(ReportJobStore::unsettled(&self.pool, limit).await?)
    }
}
