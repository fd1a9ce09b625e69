use crate::notifier::Notifier;
use crate::store::{ReportStore, StageQueue};
use app_state::{AppSettings, ProviderKind};
use language_model::{CompletionClient, OpenAiClient, SharedCompletionClient, SonarClient};
use std::sync::Arc;

/// Routes a stage's configured provider kind to a concrete client.
#[derive(Clone)]
pub struct ModelRouter {
    reasoning: SharedCompletionClient,
    search: SharedCompletionClient,
}

impl ModelRouter {
    #[must_use]
    pub fn new(reasoning: SharedCompletionClient, search: SharedCompletionClient) -> Self {
        Self { reasoning, search }
    }

    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            reasoning: Arc::new(OpenAiClient::new(
                &settings.pipeline.providers.reasoning_base_url,
                &settings.secrets.reasoning_api_key,
            )),
            search: Arc::new(SonarClient::new(
                &settings.pipeline.providers.search_base_url,
                &settings.secrets.search_api_key,
            )),
        }
    }

    #[must_use]
    pub fn for_kind(&self, kind: ProviderKind) -> &dyn CompletionClient {
        match kind {
            ProviderKind::Reasoning => self.reasoning.as_ref(),
            ProviderKind::Search => self.search.as_ref(),
        }
    }
}

/// Everything stage execution needs, constructed once at process start and
/// passed in explicitly. No lazily-initialized module-level clients.
#[derive(Clone)]
pub struct PipelineContext {
    pub settings: AppSettings,
    pub store: Arc<dyn ReportStore>,
    pub queue: Arc<dyn StageQueue>,
    pub models: ModelRouter,
    pub notifier: Arc<dyn Notifier>,
}

impl PipelineContext {
    #[must_use]
    pub fn new(
        settings: AppSettings,
        store: Arc<dyn ReportStore>,
        queue: Arc<dyn StageQueue>,
        models: ModelRouter,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            settings,
            store,
            queue,
            models,
            notifier,
        }
    }
}
