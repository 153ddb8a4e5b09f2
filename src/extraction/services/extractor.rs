//! Turns meeting minutes into candidate tasks.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::extraction::{
    domain::{ExtractionError, ParsedReply, SYSTEM_PROMPT, parse_reply, render_prompt},
    ports::{CompletionRequest, CompletionSource},
};
use crate::task::domain::CandidateTask;

/// Sampling settings applied to every extraction request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionSettings {
    /// Sampling temperature.
    pub temperature: f32,
    /// Cap on generated tokens.
    pub max_tokens: u32,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

/// How an extraction attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// The input was blank; no request was sent.
    Skipped,
    /// The reply was parsed.
    Completed,
    /// The request or reply handling failed; the failure was logged.
    Failed,
}

/// Outcome of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Valid candidates, in reply order.
    pub candidates: Vec<CandidateTask>,
    /// Number of reply entries dropped by validation.
    pub ignored: usize,
    /// How the attempt ended.
    pub status: ExtractionStatus,
}

impl ExtractionReport {
    const fn empty(status: ExtractionStatus) -> Self {
        Self {
            candidates: Vec::new(),
            ignored: 0,
            status,
        }
    }
}

/// Extraction service over a completion source.
#[derive(Clone)]
pub struct TaskExtractor<C>
where
    C: CompletionSource,
{
    source: Arc<C>,
    settings: ExtractionSettings,
}

impl<C> TaskExtractor<C>
where
    C: CompletionSource,
{
    /// Creates an extractor with default sampling settings.
    #[must_use]
    pub fn new(source: Arc<C>) -> Self {
        Self::with_settings(source, ExtractionSettings::default())
    }

    /// Creates an extractor with explicit sampling settings.
    #[must_use]
    pub const fn with_settings(source: Arc<C>, settings: ExtractionSettings) -> Self {
        Self { source, settings }
    }

    /// Returns the sampling settings.
    #[must_use]
    pub const fn settings(&self) -> ExtractionSettings {
        self.settings
    }

    /// Extracts candidate tasks from `minutes`.
    ///
    /// Never fails: blank input and every failure yield an empty list.
    pub async fn extract(&self, minutes: &str) -> Vec<CandidateTask> {
        self.extract_report(minutes).await.candidates
    }

    /// Extracts candidate tasks and reports how the attempt ended.
    pub async fn extract_report(&self, minutes: &str) -> ExtractionReport {
        if minutes.trim().is_empty() {
            debug!("extract: blank input, skipping completion request");
            return ExtractionReport::empty(ExtractionStatus::Skipped);
        }

        match self.try_extract(minutes).await {
            Ok(parsed) => {
                info!(
                    candidates = parsed.candidates.len(),
                    ignored = parsed.ignored,
                    "extract: reply parsed"
                );
                ExtractionReport {
                    candidates: parsed.candidates,
                    ignored: parsed.ignored,
                    status: ExtractionStatus::Completed,
                }
            }
            Err(err) => {
                warn!(error = %err, "extract: extraction failed");
                ExtractionReport::empty(ExtractionStatus::Failed)
            }
        }
    }

    async fn try_extract(&self, minutes: &str) -> Result<ParsedReply, ExtractionError> {
        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_owned(),
            prompt: render_prompt(minutes)?,
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };
        let reply = self
            .source
            .complete(request)
            .await?
            .ok_or(ExtractionError::NoContent)?;
        Ok(parse_reply(&reply)?)
    }
}
