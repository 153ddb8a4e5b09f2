//! `PostgreSQL` task store implementation.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        CandidateTask, OwnerId, PersistedTask, PersistedTaskData, Priority, TaskId, TaskPatch,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use tracing::debug;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Builds a pool for `database_url` and wraps it in a store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the pool cannot be built.
    pub fn connect(database_url: &str, pool_size: u32) -> TaskStoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(TaskStoreError::persistence)?;
        Ok(Self::new(pool))
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create(
        &self,
        owner: &OwnerId,
        candidate: &CandidateTask,
    ) -> TaskStoreResult<PersistedTask> {
        debug!(owner = %owner, "create: inserting task");
        let owner_id = owner.clone();
        let task = candidate.clone();
        self.run_blocking(move |connection| {
            let new_row = NewTaskRow {
                owner_id: owner_id.as_str(),
                description: task.description(),
                assignee: task.assignee(),
                deadline: task.deadline(),
                priority: task.priority().as_str(),
            };
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            row_to_task(row)
        })
        .await
    }

    async fn list_for_owner(&self, owner: &OwnerId) -> TaskStoreResult<Vec<PersistedTask>> {
        debug!(owner = %owner, "list_for_owner: querying tasks");
        let owner_id = owner.clone();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner_id.as_str()))
                .order((tasks::created_at.desc(), tasks::sequence.desc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn update(
        &self,
        owner: &OwnerId,
        id: TaskId,
        patch: &TaskPatch,
    ) -> TaskStoreResult<()> {
        debug!(owner = %owner, task_id = %id, "update: writing patch");
        let owner_id = owner.clone();
        let changeset = to_changeset(patch);
        let is_empty = patch.is_empty();
        self.run_blocking(move |connection| {
            let owned = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .filter(tasks::owner_id.eq(owner_id.as_str()));

            // Diesel rejects an empty changeset, so only check existence.
            let affected = if is_empty {
                owned
                    .count()
                    .get_result::<i64>(connection)
                    .map_err(TaskStoreError::persistence)?
            } else {
                let updated = diesel::update(owned)
                    .set(&changeset)
                    .execute(connection)
                    .map_err(TaskStoreError::persistence)?;
                i64::try_from(updated).map_err(TaskStoreError::persistence)?
            };

            if affected == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<()> {
        debug!(owner = %owner, task_id = %id, "delete: removing task");
        let owner_id = owner.clone();
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner_id.as_str())),
            )
            .execute(connection)
            .map_err(TaskStoreError::persistence)?;

            if deleted == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_changeset(patch: &TaskPatch) -> TaskChangeset {
    TaskChangeset {
        description: patch.description.clone(),
        assignee: patch.assignee.clone(),
        deadline: patch.deadline.clone(),
        priority: patch.priority.map(|priority| priority.as_str().to_owned()),
        completed: patch.completed,
    }
}

fn row_to_task(row: TaskRow) -> TaskStoreResult<PersistedTask> {
    let TaskRow {
        id,
        owner_id,
        description,
        assignee,
        deadline,
        priority: persisted_priority,
        completed,
        created_at,
    } = row;

    let priority =
        Priority::try_from(persisted_priority.as_str()).map_err(TaskStoreError::persistence)?;
    let task = CandidateTask::new(description, assignee, deadline, priority)
        .map_err(TaskStoreError::persistence)?;
    let owner = OwnerId::new(owner_id).map_err(TaskStoreError::persistence)?;

    Ok(PersistedTask::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        owner_id: owner,
        created_at,
        task,
        completed,
    }))
}
