use common_types::{ReportStatus, Stage};
use language_model::ProviderError;
use thiserror::Error;
use uuid::Uuid;

/// Storage-layer failures, kept backend-agnostic so the pipeline stays
/// testable against in-memory stores.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("report {0} not found")]
    NotFound(Uuid),

    #[error("version conflict for report {report_id}: expected version {expected}")]
    VersionConflict { report_id: Uuid, expected: i32 },

    #[error("invalid status transition {from:?} -> {to:?} for report {report_id}")]
    InvalidTransition {
        report_id: Uuid,
        from: ReportStatus,
        to: ReportStatus,
    },

    #[error("storage backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

/// Stage-level error taxonomy. Stage handlers catch all of these at the top
/// level and convert them into a `failed` status write; the Sweeper is the
/// only automatic recovery path.
#[derive(Error, Debug)]
pub enum StageError {
    /// The stage was invoked before a dependency's output exists. Fatal for
    /// this invocation; retrying without the prerequisite fails identically.
    #[error("{stage} invoked without output of stage {missing}")]
    PrerequisiteMissing { stage: Stage, missing: i32 },

    /// The model call failed or returned a non-success status.
    #[error("provider call failed at {stage}: {source}")]
    Provider {
        stage: Stage,
        #[source]
        source: ProviderError,
    },

    /// The model output could not be parsed into the stage's schema after
    /// best-effort cleanup. The raw text is kept for operator diagnosis.
    #[error("malformed model response at {stage}: {detail}")]
    MalformedResponse {
        stage: Stage,
        detail: String,
        raw: String,
    },

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),
}

impl StageError {
    /// A lost optimistic-concurrency race means another writer progressed the
    /// job; it must not be recorded as a terminal failure.
    #[must_use]
    pub const fn is_lost_race(&self) -> bool {
        matches!(
            self,
            Self::Persistence(StoreError::VersionConflict { .. })
                | Self::Persistence(StoreError::InvalidTransition { .. })
        )
    }
}
