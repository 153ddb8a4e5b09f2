//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// The assignee is empty after trimming.
    #[error("task assignee must not be empty")]
    EmptyAssignee,

    /// The deadline is empty after trimming.
    #[error("task deadline must not be empty")]
    EmptyDeadline,

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwnerId,
}

/// Error returned while parsing a priority from text or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority '{0}', expected P1, P2 or P3")]
pub struct ParsePriorityError(pub String);
