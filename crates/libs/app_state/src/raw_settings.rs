use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct RawSettings {
    pub api: ApiSettings,
    pub logging: LoggingSettings,
    pub pipeline: PipelineSettings,
    pub secrets: SecretSettings,
}

/// Configuration for the API server.
#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    /// Public base URL of the website, used to build report links.
    pub public_url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PipelineSettings {
    pub providers: ProviderEndpoints,
    pub stages: StageTable,
    pub sweep: SweepSettings,
    pub email: EmailSettings,
}

/// Base URLs for the two model providers. Keys live in [`SecretSettings`].
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderEndpoints {
    pub reasoning_base_url: String,
    pub search_base_url: String,
}

/// Which provider variant serves a stage.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Reasoning-depth model (problem analysis, curation, report writing).
    Reasoning,
    /// Retrieval/web-search augmented model (tool research only).
    Search,
}

/// Per-stage model routing, kept as a lookup table so operators can swap
/// models without touching handler logic.
#[derive(Debug, Deserialize, Clone)]
pub struct StageTable {
    pub stage1: StageModelSettings,
    pub stage2: StageModelSettings,
    pub stage3: StageModelSettings,
    pub stage4: StageModelSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StageModelSettings {
    pub provider: ProviderKind,
    pub model: String,
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub reasoning_effort: Option<String>,
    #[serde(default)]
    pub verbosity: Option<String>,
    pub timeout_secs: u64,
}

/// Retry sweeper thresholds; ages are judged against `updated_at`.
#[derive(Debug, Deserialize, Clone)]
pub struct SweepSettings {
    /// A `processing` row older than this is assumed stuck.
    pub stuck_after_secs: u64,
    /// Minimum age before a `failed` row is retried again.
    pub retry_cooldown_secs: u64,
    /// A `failed` row older than this is permanently abandoned.
    pub retry_window_secs: u64,
    /// Rows re-triggered per sweep pass.
    pub batch_size: u32,
    /// Spacing between re-enqueued rows, to avoid bursting the provider API.
    pub stagger_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    pub base_url: String,
    pub from: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecretSettings {
    pub database_url: String,
    /// Shared secret for the internal stage-trigger endpoints.
    pub internal_secret: String,
    /// Bearer secret for the cron sweep endpoint.
    pub cron_secret: String,
    pub reasoning_api_key: String,
    pub search_api_key: String,
    pub email_api_key: String,
}
