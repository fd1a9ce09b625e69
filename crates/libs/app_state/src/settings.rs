use crate::{RawSettings, StageModelSettings};
use common_types::Stage;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: crate::ApiSettings,
    pub logging: crate::LoggingSettings,
    pub pipeline: crate::PipelineSettings,
    pub secrets: crate::SecretSettings,
}

impl From<RawSettings> for AppSettings {
    fn from(raw: RawSettings) -> Self {
        Self {
            api: raw.api,
            logging: raw.logging,
            pipeline: raw.pipeline,
            secrets: raw.secrets,
        }
    }
}

impl AppSettings {
    /// Model routing for a pipeline stage.
    #[must_use]
    pub fn stage_model(&self, stage: Stage) -> &StageModelSettings {
        match stage {
            Stage::ProblemAnalysis => &self.pipeline.stages.stage1,
            Stage::ToolResearch => &self.pipeline.stages.stage2,
            Stage::ToolCuration => &self.pipeline.stages.stage3,
            Stage::ReportGeneration => &self.pipeline.stages.stage4,
        }
    }

    /// Public URL a report is retrievable at, built from its access token.
    #[must_use]
    pub fn report_url(&self, access_token: &str) -> String {
        format!(
            "{}/report/{access_token}",
            self.api.public_url.trim_end_matches('/')
        )
    }
}
