//! Record store port for persisted tasks.

use crate::task::domain::{CandidateTask, OwnerId, PersistedTask, TaskId, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every record belongs to exactly one owner and every operation is scoped
/// to that owner.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Writes a candidate as a new record owned by `owner`.
    ///
    /// The store assigns the identifier and creation timestamp; the record
    /// starts out not completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the write fails.
    async fn create(
        &self,
        owner: &OwnerId,
        candidate: &CandidateTask,
    ) -> TaskStoreResult<PersistedTask>;

    /// Returns all records owned by `owner`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the query fails.
    async fn list_for_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<PersistedTask>>;

    /// Writes the fields carried by `patch` to the record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when `owner` has no record `id`.
    async fn update(&self, owner: &OwnerId, id: TaskId, patch: &TaskPatch)
    -> TaskStoreResult<()>;

    /// Deletes the record `id`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when `owner` has no record `id`.
    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found for the requesting owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
