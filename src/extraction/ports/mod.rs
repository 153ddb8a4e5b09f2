//! Port contracts for task extraction.

pub mod completion;

pub use completion::{CompletionError, CompletionRequest, CompletionResult, CompletionSource};
