use crate::completion::{
    ChatMessage, ChatResponse, Completion, CompletionClient, CompletionRequest, ProviderError,
    ProviderResult,
};
use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

/// Search-grounded provider (Perplexity Sonar API). Used exclusively for the
/// tool-research stage, where answers must be grounded in current product data.
pub struct SonarClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct SonarChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl SonarClient {
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
impl CompletionClient for SonarClient {
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<Completion> {
        let body = SonarChatRequest {
            model: &request.model,
            messages: vec![ChatMessage {
                role: "user",
                content: request.prompt.clone(),
            }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };
        let url = format!("{}/chat/completions", self.base_url);
        debug!(model = %request.model, "calling search provider");

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
        "sonar"
    }
}
