//! In-memory task store for board tests.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{CandidateTask, OwnerId, PersistedTask, PersistedTaskData, TaskId, TaskPatch},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Creation timestamps come from the injected clock. Records created within
/// the same clock tick are still listed newest first thanks to an insertion
/// sequence.
#[derive(Clone)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryStoreState>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    records: HashMap<TaskId, StoredRecord>,
    next_sequence: u64,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    sequence: u64,
    task: PersistedTask,
}

impl InMemoryTaskStore {
    /// Creates an empty store using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Creates an empty store using `clock` for creation timestamps.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            clock,
        }
    }

    /// Returns the number of records across all owners.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn len(&self) -> TaskStoreResult<usize> {
        let state = self.state.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.records.len())
    }

    /// Returns `true` when the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns persistence errors when lock acquisition fails.
    pub fn is_empty(&self) -> TaskStoreResult<bool> {
        self.len().map(|count| count == 0)
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InMemoryTaskStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskStore")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Looks up a record owned by `owner`, hiding records of other owners.
fn owned_record<'a>(
    state: &'a mut InMemoryStoreState,
    owner: &OwnerId,
    id: TaskId,
) -> TaskStoreResult<&'a mut StoredRecord> {
    state
        .records
        .get_mut(&id)
        .filter(|record| record.task.owner_id() == owner)
        .ok_or(TaskStoreError::NotFound(id))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(
        &self,
        owner: &OwnerId,
        candidate: &CandidateTask,
    ) -> TaskStoreResult<PersistedTask> {
        let mut state = self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let task = PersistedTask::from_persisted(PersistedTaskData {
            id: TaskId::new(),
            owner_id: owner.clone(),
            created_at: self.clock.utc(),
            task: candidate.clone(),
            completed: false,
        });
        let sequence = state.next_sequence;
        state.next_sequence += 1;
        state.records.insert(
            task.id(),
            StoredRecord {
                sequence,
                task: task.clone(),
            },
        );
        Ok(task)
    }

    async fn list_for_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<PersistedTask>> {
        let state = self.state.read().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let mut owned: Vec<&StoredRecord> = state
            .records
            .values()
            .filter(|record| record.task.owner_id() == owner)
            .collect();
        owned.sort_by(|left, right| {
            right
                .task
                .created_at()
                .cmp(&left.task.created_at())
                .then_with(|| right.sequence.cmp(&left.sequence))
        });
        Ok(owned.into_iter().map(|record| record.task.clone()).collect())
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        patch: &TaskPatch,
    ) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let record = owned_record(&mut state, owner, id)?;
        record.task.apply_patch(patch);
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskStoreError::persistence(std::io::Error::other(err.to_string()))
        })?;
        owned_record(&mut state, owner, id)?;
        state.records.remove(&id);
        Ok(())
    }
}
