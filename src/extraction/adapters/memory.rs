//! Scripted in-memory completion source.

use crate::extraction::ports::{
    CompletionError, CompletionRequest, CompletionResult, CompletionSource,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, RwLock};

/// One canned answer of a [`ScriptedCompletionSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedReply {
    /// Reply with the given text.
    Text(String),
    /// Reply without content.
    Empty,
    /// Fail with a transport error carrying the message.
    Failure(String),
}

/// Completion source answering from a queue of scripted replies.
///
/// Every request is recorded so tests can inspect prompts and call counts.
/// Once the script is exhausted further calls fail.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCompletionSource {
    state: Arc<RwLock<ScriptState>>,
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<ScriptedReply>,
    requests: Vec<CompletionRequest>,
}

impl ScriptedCompletionSource {
    /// Creates a source with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source that answers once with `text`.
    #[must_use]
    pub fn replying(text: impl Into<String>) -> Self {
        let source = Self::new();
        source.push(ScriptedReply::Text(text.into()));
        source
    }

    /// Creates a source whose first call fails with `message`.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        let source = Self::new();
        source.push(ScriptedReply::Failure(message.into()));
        source
    }

    /// Appends a reply to the script.
    pub fn push(&self, reply: ScriptedReply) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.replies.push_back(reply);
    }

    /// Returns the requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<CompletionRequest> {
        let state = self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.requests.clone()
    }

    /// Returns the number of requests received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        let state = self
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        state.requests.len()
    }
}

#[async_trait]
impl CompletionSource for ScriptedCompletionSource {
    async fn complete(&self, request: CompletionRequest) -> CompletionResult<Option<String>> {
        let mut state = self
            .state
            .write()
            .map_err(|err| CompletionError::transport(std::io::Error::other(err.to_string())))?;
        state.requests.push(request);
        match state.replies.pop_front() {
            Some(ScriptedReply::Text(text)) => Ok(Some(text)),
            Some(ScriptedReply::Empty) => Ok(None),
            Some(ScriptedReply::Failure(message)) => {
                Err(CompletionError::transport(std::io::Error::other(message)))
            }
            None => Err(CompletionError::InvalidResponse(
                "completion script exhausted".to_owned(),
            )),
        }
    }
}
