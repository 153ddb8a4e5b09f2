//! Error types for task extraction.

use crate::extraction::ports::CompletionError;
use thiserror::Error;

/// Reasons a completion reply could not be turned into entries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// The reply was empty once code fences and whitespace were removed.
    #[error("completion reply is empty")]
    Empty,

    /// The reply is not valid JSON.
    #[error("completion reply is not valid JSON: {0}")]
    Malformed(String),

    /// The reply is valid JSON but not an array.
    #[error("completion reply is not a JSON array")]
    NotAnArray,

    /// The code-fence pattern failed to compile.
    #[error("invalid code fence pattern: {0}")]
    Pattern(String),
}

/// Failures of a single extraction attempt.
#[derive(Debug, Clone, Error)]
pub enum ExtractionError {
    /// The instruction template failed to render.
    #[error("failed to render extraction prompt: {0}")]
    Prompt(String),

    /// The completion service call failed.
    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The completion service returned no content.
    #[error("completion service returned no content")]
    NoContent,

    /// The reply could not be parsed.
    #[error(transparent)]
    Reply(#[from] ReplyError),
}
