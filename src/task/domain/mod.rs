//! Domain model for meeting-minute action items.
//!
//! Candidates are validated task fields without identity; persisted tasks
//! add the store-assigned identifier, owner, creation time and completion
//! flag. Partial updates only ever address the mutable fields.

mod candidate;
mod error;
mod ids;
mod priority;
mod record;

pub use candidate::CandidateTask;
pub use error::{ParsePriorityError, TaskDomainError};
pub use ids::{OwnerId, TaskId};
pub use priority::Priority;
pub use record::{PersistedTask, PersistedTaskData, TaskPatch};
