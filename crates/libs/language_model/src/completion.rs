use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("provider returned an empty completion")]
    EmptyCompletion,
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// One normalized completion call. Stage handlers fill this from the
/// per-stage settings table; providers only translate it to their wire format.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub reasoning_effort: Option<String>,
    pub verbosity: Option<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub content: String,
}

/// Normalized `{prompt, ...} -> {content}` contract over the model providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> ProviderResult<Completion>;

    /// Provider name for logging.
    fn name(&self) -> &'static str;
}

pub type SharedCompletionClient = Arc<dyn CompletionClient>;

// OpenAI-compatible chat wire format, shared by both providers.

#[derive(Serialize, Debug)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponseMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    pub(crate) fn into_completion(self) -> ProviderResult<Completion> {
        let content = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();
        if content.trim().is_empty() {
            return Err(ProviderError::EmptyCompletion);
        }
        Ok(Completion { content })
    }
}
