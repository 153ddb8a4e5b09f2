//! OpenAI-compatible chat-completions adapter.

use crate::config::CompletionConfig;
use crate::extraction::ports::{
    CompletionError, CompletionRequest, CompletionResult, CompletionSource,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Completion source backed by the `/v1/chat/completions` endpoint.
///
/// Requests are sent once; failures surface to the caller without retries.
pub struct OpenAiCompletionSource {
    model: String,
    api_key: Option<String>,
    api_key_env: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for OpenAiCompletionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompletionSource")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiCompletionSource {
    /// Creates a source from completion settings.
    ///
    /// A missing API key is reported by each request rather than here, so
    /// sessions that never extract can still be built.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError::Transport`] when the HTTP client cannot be
    /// built.
    pub fn from_config(config: &CompletionConfig) -> CompletionResult<Self> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.api_key().ok();
        let mut builder = Client::builder();
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }
        let http = builder.build().map_err(CompletionError::transport)?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            api_key_env: config.api_key_env.clone(),
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.prompt },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        })
    }
}

fn first_choice_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
}

#[async_trait]
impl CompletionSource for OpenAiCompletionSource {
    async fn complete(&self, request: CompletionRequest) -> CompletionResult<Option<String>> {
        debug!(model = %self.model, max_tokens = request.max_tokens, "complete: called");
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            CompletionError::Configuration(format!("{} is not set", self.api_key_env))
        })?;
        let body = self.build_request_body(&request);
        let response = self
            .http
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .await
            .map_err(CompletionError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "complete: API error");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|err| CompletionError::InvalidResponse(err.to_string()))?;
        Ok(first_choice_content(parsed))
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
