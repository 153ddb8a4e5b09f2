//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Store-assigned task identifier.
    pub id: uuid::Uuid,
    /// Owning user identifier.
    pub owner_id: String,
    /// Task description.
    pub description: String,
    /// Free-form assignee name.
    pub assignee: String,
    /// Deadline text.
    pub deadline: String,
    /// Priority tier.
    pub priority: String,
    /// Completion flag.
    pub completed: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for task records.
///
/// `id`, `created_at`, `completed` and `sequence` take their column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow<'a> {
    /// Owning user identifier.
    pub owner_id: &'a str,
    /// Task description.
    pub description: &'a str,
    /// Free-form assignee name.
    pub assignee: &'a str,
    /// Deadline text.
    pub deadline: &'a str,
    /// Priority tier.
    pub priority: &'a str,
}

/// Changeset for partial task updates.
///
/// `None` fields are left out of the generated `UPDATE`.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = tasks)]
pub struct TaskChangeset {
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement assignee.
    pub assignee: Option<String>,
    /// Replacement deadline.
    pub deadline: Option<String>,
    /// Replacement priority tier.
    pub priority: Option<String>,
    /// Replacement completion flag.
    pub completed: Option<bool>,
}
