//! Persisted task records and partial updates.

use super::{CandidateTask, OwnerId, Priority, TaskDomainError, TaskId, candidate::required};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task stored in the record store.
///
/// `id`, `owner_id` and `created_at` are assigned by the store and never
/// change afterwards; only the task fields and `completed` are mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTask {
    id: TaskId,
    owner_id: OwnerId,
    created_at: DateTime<Utc>,
    description: String,
    assignee: String,
    deadline: String,
    priority: Priority,
    completed: bool,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Store-assigned identifier.
    pub id: TaskId,
    /// Owning user.
    pub owner_id: OwnerId,
    /// Store-assigned creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Task fields captured from the candidate.
    pub task: CandidateTask,
    /// Completion flag.
    pub completed: bool,
}

impl PersistedTask {
    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        let PersistedTaskData {
            id,
            owner_id,
            created_at,
            task,
            completed,
        } = data;
        Self {
            id,
            owner_id,
            created_at,
            description: task.description().to_owned(),
            assignee: task.assignee().to_owned(),
            deadline: task.deadline().to_owned(),
            priority: task.priority(),
            completed,
        }
    }

    /// Returns the store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
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

    /// Returns the deadline as originally phrased.
    #[must_use]
    pub fn deadline(&self) -> &str {
        &self.deadline
    }

    /// Returns the priority tier.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns whether the task has been completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Merges the mutable fields carried by `patch` into this record.
    ///
    /// Identity, ownership and creation time are untouched whatever the
    /// patch contains.
    pub fn apply_patch(&mut self, patch: &TaskPatch) {
        if let Some(description) = &patch.description {
            description.clone_into(&mut self.description);
        }
        if let Some(assignee) = &patch.assignee {
            assignee.clone_into(&mut self.assignee);
        }
        if let Some(deadline) = &patch.deadline {
            deadline.clone_into(&mut self.deadline);
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
    }
}

/// Partial update of the mutable fields of a persisted task.
///
/// Deserialisation ignores unknown keys, so payloads that still carry `id`,
/// `createdAt` or owner fields decode into a patch without them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Replacement assignee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// Replacement deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Replacement priority.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    /// Replacement completion flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Sets the deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: impl Into<String>) -> Self {
        self.deadline = Some(deadline.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    /// Returns `true` when the patch carries no fields.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.assignee.is_none()
            && self.deadline.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }

    /// Returns the patch with text fields trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when a supplied text field is empty after
    /// trimming.
    pub fn validated(self) -> Result<Self, TaskDomainError> {
        let Self {
            description,
            assignee,
            deadline,
            priority,
            completed,
        } = self;
        Ok(Self {
            description: description
                .map(|value| required(value, TaskDomainError::EmptyDescription))
                .transpose()?,
            assignee: assignee
                .map(|value| required(value, TaskDomainError::EmptyAssignee))
                .transpose()?,
            deadline: deadline
                .map(|value| required(value, TaskDomainError::EmptyDeadline))
                .transpose()?,
            priority,
            completed,
        })
    }
}
