use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::Type;
use uuid::Uuid;

/// The four sequential LLM-driven transformation steps of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ProblemAnalysis,
    ToolResearch,
    ToolCuration,
    ReportGeneration,
}

impl Stage {
    pub const ALL: [Self; 4] = [
        Self::ProblemAnalysis,
        Self::ToolResearch,
        Self::ToolCuration,
        Self::ReportGeneration,
    ];

    #[must_use]
    pub const fn number(self) -> i32 {
        match self {
            Self::ProblemAnalysis => 1,
            Self::ToolResearch => 2,
            Self::ToolCuration => 3,
            Self::ReportGeneration => 4,
        }
    }

    #[must_use]
    pub const fn from_number(n: i32) -> Option<Self> {
        match n {
            1 => Some(Self::ProblemAnalysis),
            2 => Some(Self::ToolResearch),
            3 => Some(Self::ToolCuration),
            4 => Some(Self::ReportGeneration),
            _ => None,
        }
    }

    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::ProblemAnalysis => Some(Self::ToolResearch),
            Self::ToolResearch => Some(Self::ToolCuration),
            Self::ToolCuration => Some(Self::ReportGeneration),
            Self::ReportGeneration => None,
        }
    }

    /// Report status written when this stage's output is persisted.
    #[must_use]
    pub const fn completion_status(self) -> ReportStatus {
        match self {
            Self::ProblemAnalysis => ReportStatus::Stage1Complete,
            Self::ToolResearch => ReportStatus::Stage2Complete,
            Self::ToolCuration => ReportStatus::Stage3Complete,
            Self::ReportGeneration => ReportStatus::Completed,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {}", self.number())
    }
}

/// Closed status set for a report job. Writes go through [`ReportStatus::can_transition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "report_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    Processing,
    Stage1Complete,
    Stage2Complete,
    Stage3Complete,
    Completed,
    Failed,
}

impl ReportStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Validated transition table.
    ///
    /// Re-entry after a failure, a stuck run, or a forced regeneration always
    /// passes through `Processing` again; stage completions advance in order.
    #[must_use]
    pub const fn can_transition(self, next: Self) -> bool {
        use ReportStatus::{
            Completed, Failed, Pending, Processing, Stage1Complete, Stage2Complete, Stage3Complete,
        };
        match (self, next) {
            // Normal chain advance.
            (Stage1Complete, Stage2Complete)
            | (Stage2Complete, Stage3Complete)
            | (Stage3Complete, Completed) => true,
            // `Processing` covers stage 1 in flight and every re-entry path,
            // which resumes at whichever stage output is missing.
            (Processing, Stage1Complete | Stage2Complete | Stage3Complete | Completed) => true,
            // Start, sweeper retry, forced regeneration.
            (Pending | Failed | Completed, Processing) => true,
            // Anything in flight can fail.
            (
                Pending | Processing | Stage1Complete | Stage2Complete | Stage3Complete,
                Failed,
            ) => true,
            _ => false,
        }
    }
}

/// One report-generation attempt: the single authoritative row for a quiz
/// submission's report. Stage outputs are opaque JSON blobs, overwritten only
/// on a forced re-run.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportJob {
    pub id: Uuid,
    pub quiz_response_id: Uuid,
    pub status: ReportStatus,
    pub stage1_output: Option<Value>,
    pub stage2_output: Option<Value>,
    pub stage3_output: Option<Value>,
    pub stage4_output: Option<Value>,
    /// Unguessable public identifier for unauthenticated retrieval.
    pub access_token: String,
    pub failed_at_stage: Option<i32>,
    pub error_message: Option<String>,
    /// Optimistic concurrency token; every stage write is a compare-and-swap.
    pub version: i32,
    pub email_sent_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReportJob {
    #[must_use]
    pub fn stage_output(&self, stage: Stage) -> Option<&Value> {
        match stage {
            Stage::ProblemAnalysis => self.stage1_output.as_ref(),
            Stage::ToolResearch => self.stage2_output.as_ref(),
            Stage::ToolCuration => self.stage3_output.as_ref(),
            Stage::ReportGeneration => self.stage4_output.as_ref(),
        }
    }

    /// A stage may only run once every lower-numbered stage has persisted output.
    #[must_use]
    pub fn prerequisites_met(&self, stage: Stage) -> bool {
        Stage::ALL
            .iter()
            .filter(|s| **s < stage)
            .all(|s| self.stage_output(*s).is_some())
    }

    /// First stage with no persisted output; `None` once all four are present.
    #[must_use]
    pub fn next_missing_stage(&self) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .find(|s| self.stage_output(*s).is_none())
    }

    #[must_use]
    pub fn completed_stages(&self) -> usize {
        Stage::ALL
            .iter()
            .filter(|s| self.stage_output(**s).is_some())
            .count()
    }

    /// Heuristic 0-100 progress derived from which stage outputs are non-null,
    /// not a true percentage.
    #[must_use]
    pub fn progress(&self) -> u8 {
        if self.status == ReportStatus::Completed {
            return 100;
        }
        match self.completed_stages() {
            0 => {
                if self.status == ReportStatus::Pending {
                    5
                } else {
                    10
                }
            }
            1 => 35,
            2 => 60,
            3 => 85,
            _ => 95,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn job_with_outputs(n: usize, status: ReportStatus) -> ReportJob {
        let output = |i: usize| (i < n).then(|| json!({"stage": i + 1}));
        ReportJob {
            id: Uuid::new_v4(),
            quiz_response_id: Uuid::new_v4(),
            status,
            stage1_output: output(0),
            stage2_output: output(1),
            stage3_output: output(2),
            stage4_output: output(3),
            access_token: "t".repeat(32),
            failed_at_stage: None,
            error_message: None,
            version: 0,
            email_sent_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn chain_transitions_are_valid() {
        use ReportStatus::*;
        assert!(Pending.can_transition(Processing));
        assert!(Processing.can_transition(Stage1Complete));
        assert!(Stage1Complete.can_transition(Stage2Complete));
        assert!(Stage2Complete.can_transition(Stage3Complete));
        assert!(Stage3Complete.can_transition(Completed));
    }

    #[test]
    fn retry_paths_pass_through_processing() {
        use ReportStatus::*;
        assert!(Failed.can_transition(Processing));
        assert!(Completed.can_transition(Processing));
        assert!(Processing.can_transition(Stage3Complete));
        assert!(Processing.can_transition(Completed));
    }

    #[test]
    fn invalid_transitions_are_rejected() {
        use ReportStatus::*;
        assert!(!Pending.can_transition(Stage1Complete));
        assert!(!Stage1Complete.can_transition(Stage3Complete));
        assert!(!Stage2Complete.can_transition(Stage1Complete));
        assert!(!Completed.can_transition(Failed));
        assert!(!Failed.can_transition(Completed));
        assert!(!Completed.can_transition(Completed));
    }

    #[test]
    fn prerequisites_follow_stage_order() {
        let job = job_with_outputs(1, ReportStatus::Stage1Complete);
        assert!(job.prerequisites_met(Stage::ProblemAnalysis));
        assert!(job.prerequisites_met(Stage::ToolResearch));
        assert!(!job.prerequisites_met(Stage::ToolCuration));
        assert!(!job.prerequisites_met(Stage::ReportGeneration));
        assert_eq!(job.next_missing_stage(), Some(Stage::ToolResearch));
    }

    #[test]
    fn progress_tracks_output_columns() {
        assert_eq!(job_with_outputs(0, ReportStatus::Pending).progress(), 5);
        assert_eq!(job_with_outputs(0, ReportStatus::Processing).progress(), 10);
        assert_eq!(
            job_with_outputs(1, ReportStatus::Stage1Complete).progress(),
            35
        );
        assert_eq!(
            job_with_outputs(3, ReportStatus::Stage3Complete).progress(),
            85
        );
        assert_eq!(job_with_outputs(4, ReportStatus::Completed).progress(), 100);
    }

    #[test]
    fn stage_numbering_round_trips() {
        for stage in Stage::ALL {
            assert_eq!(Stage::from_number(stage.number()), Some(stage));
        }
        assert_eq!(Stage::from_number(0), None);
        assert_eq!(Stage::from_number(5), None);
        assert_eq!(Stage::ProblemAnalysis.next(), Some(Stage::ToolResearch));
        assert_eq!(Stage::ReportGeneration.next(), None);
    }
}
