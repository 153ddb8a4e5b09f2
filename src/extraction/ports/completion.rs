//! Text-completion source port.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for completion operations.
pub type CompletionResult<T> = Result<T, CompletionError>;

/// A single prompt sent to a completion service.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System message framing the conversation.
    pub system_prompt: String,
    /// User message carrying the full instructions.
    pub prompt: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Cap on generated tokens.
    pub max_tokens: u32,
}

/// Hosted text-completion contract.
///
/// Each call is independent; implementations neither retry nor stream.
#[async_trait]
pub trait CompletionSource: Send + Sync {
    /// Sends `request` and returns the text of the first reply, if any.
    ///
    /// # Errors
    ///
    /// Returns [`CompletionError`] when the service cannot be reached or
    /// rejects the request.
    async fn complete(&self, request: CompletionRequest) -> CompletionResult<Option<String>>;
}

/// Errors returned by completion source adapters.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// The service answered with a non-success status.
    #[error("completion API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("invalid completion response: {0}")]
    InvalidResponse(String),

    /// The adapter is misconfigured.
    #[error("completion source misconfigured: {0}")]
    Configuration(String),

    /// Network or transport failure.
    #[error("completion transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl CompletionError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
