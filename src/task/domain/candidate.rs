//! Candidate action items awaiting user approval.

use super::{Priority, TaskDomainError, TaskPatch};
use serde::{Deserialize, Serialize};

/// An extracted or hand-edited action item that has not been persisted yet.
///
/// Candidates carry no identity: they are addressed by their position in the
/// pending list of a board session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CandidateFields")]
pub struct CandidateTask {
    description: String,
    assignee: String,
    deadline: String,
    priority: Priority,
}

#[derive(Deserialize)]
struct CandidateFields {
    description: String,
    assignee: String,
    deadline: String,
    #[serde(default)]
    priority: Priority,
}

impl TryFrom<CandidateFields> for CandidateTask {
    type Error = TaskDomainError;

    fn try_from(fields: CandidateFields) -> Result<Self, Self::Error> {
        Self::new(
            fields.description,
            fields.assignee,
            fields.deadline,
            fields.priority,
        )
    }
}

impl CandidateTask {
    /// Creates a validated candidate.
    ///
    /// Text fields are trimmed. The deadline is kept verbatim otherwise; it is
    /// never interpreted as a calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the description, assignee or deadline
    /// is empty after trimming.
    pub fn new(
        description: impl Into<String>,
        assignee: impl Into<String>,
        deadline: impl Into<String>,
        priority: Priority,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            description: required(description.into(), TaskDomainError::EmptyDescription)?,
            assignee: required(assignee.into(), TaskDomainError::EmptyAssignee)?,
            deadline: required(deadline.into(), TaskDomainError::EmptyDeadline)?,
            priority,
        })
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the free-form assignee name.
    #[must_use]
    pub fn assignee(&self) -> &str {
        &self.assignee
    }

    /// Returns the deadline as phrased in the source text.
    #[must_use]
    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    /// Returns the priority tier.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns a copy with the patch's task fields applied.
    ///
    /// The `completed` flag of the patch has no candidate counterpart and is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the patch would blank a required
    /// field.
    pub fn patched(&self, patch: &TaskPatch) -> Result<Self, TaskDomainError> {
        Self::new(
            patch.description.as_deref().unwrap_or(&self.description),
            patch.assignee.as_deref().unwrap_or(&self.assignee),
            patch.deadline.as_deref().unwrap_or(&self.deadline),
            patch.priority.unwrap_or(self.priority),
        )
    }
}

/// Trims a required text value, returning `error` when nothing remains.
pub(super) fn required(value: String, error: TaskDomainError) -> Result<String, TaskDomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(error);
    }
    if trimmed.len() == value.len() {
        return Ok(value);
    }
    Ok(trimmed.to_owned())
}
