//! Board operation errors.

use super::DeletionTarget;
use crate::identity::ports::IdentityError;
use crate::task::{domain::TaskDomainError, ports::TaskStoreError};
use thiserror::Error;

/// Failures reported by board operations.
///
/// The cached state is left as it was before the operation, except for the
/// promotion of already written records after a partial save.
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// The operation needs a signed-in owner.
    #[error("sign-in required")]
    NotSignedIn,

    /// The supplied fields failed validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The record store call failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),

    /// A save batch stopped part-way through.
    #[error("saved {saved} task(s) before a write failed: {source}")]
    PartialSave {
        /// Number of candidates written and promoted before the failure.
        saved: usize,
        /// The failing write.
        source: TaskStoreError,
    },

    /// The identity source call failed.
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// No deletion awaits confirmation.
    #[error("no deletion awaiting confirmation")]
    NoPendingDeletion,

    /// The deletion target does not exist on the board.
    #[error("nothing to delete at {0}")]
    UnknownDeletionTarget(DeletionTarget),
}
