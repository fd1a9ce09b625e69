use crate::completion::{
    ChatMessage, ChatResponse, Completion, CompletionClient, CompletionRequest, ProviderError,
    ProviderResult,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Reasoning-depth provider (OpenAI chat completions API). Used for the
/// problem-analysis, curation, and report-writing stages.
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reasoning_effort: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verbosity: Option<&'a str>,
}

impl OpenAiClient {
    #[must_use]
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<Completion> {
        let body = OpenAiChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            max_completion_tokens: request.max_tokens,
            reasoning_effort: request.reasoning_effort.as_deref(),
            verbosity: request.verbosity.as_deref(),
        };
        let url = format!("{}/v1/chat/completions", self.base_url);
        debug!(model = %request.model, "calling reasoning provider");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .timeout(request.timeout)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Api {
                status: response.status(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        let full: ChatResponse = response.json().await?;
        full.into_completion()
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
