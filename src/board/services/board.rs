//! Asynchronous driver of the reconciliation board.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::board::domain::{BoardError, BoardState, DeletionTarget};
use crate::extraction::{
    ports::CompletionSource,
    services::{ExtractionReport, TaskExtractor},
};
use crate::identity::{Identity, ports::IdentitySource};
use crate::task::{
    domain::{CandidateTask, OwnerId, TaskId, TaskPatch},
    ports::TaskStore,
};

/// What the surface should show after an identity change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionView {
    /// The board belongs to this owner.
    SignedIn(OwnerId),
    /// No identity is present; the surface must ask for sign-in.
    RequiresSignIn,
}

/// One board session over a record store and a completion source.
///
/// The state lock is never held across an await point, so the board stays
/// usable while a round-trip is pending.
pub struct TaskBoard<S, C>
where
    S: TaskStore,
    C: CompletionSource,
{
    store: Arc<S>,
    extractor: TaskExtractor<C>,
    state: Mutex<BoardState>,
}

impl<S, C> TaskBoard<S, C>
where
    S: TaskStore,
    C: CompletionSource,
{
    /// Creates a signed-out board.
    #[must_use]
    pub fn new(store: Arc<S>, extractor: TaskExtractor<C>) -> Self {
        Self {
            store,
            extractor,
            state: Mutex::new(BoardState::new()),
        }
    }

    fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> BoardState {
        self.state().clone()
    }

    /// Adopts the identity reported by the identity source.
    ///
    /// A new owner starts a fresh session and loads its persisted tasks; a
    /// load failure is logged and leaves the cache empty. A missing identity
    /// drops everything and asks for sign-in.
    pub async fn apply_identity(&self, identity: Option<&Identity>) -> SessionView {
        let Some(owner) = identity.map(|signed_in| signed_in.user_id().clone()) else {
            if self.state().set_owner(None) {
                info!("apply_identity: signed out, session cleared");
            }
            return SessionView::RequiresSignIn;
        };
        if self.state().set_owner(Some(owner.clone())) {
            info!(owner = %owner, "apply_identity: session started");
            if let Err(err) = self.load_persisted().await {
                warn!(error = %err, "apply_identity: initial load failed");
            }
        }
        SessionView::SignedIn(owner)
    }

    /// Starts a session for `identity` and loads its persisted tasks.
    ///
    /// Returns the number of cached tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Store`] when the initial load fails; the
    /// session stays open with an empty cache.
    pub async fn start_session(&self, identity: &Identity) -> Result<usize, BoardError> {
        let owner = identity.user_id().clone();
        if self.state().set_owner(Some(owner.clone())) {
            info!(owner = %owner, "start_session: session started");
        }
        self.load_persisted().await
    }

    /// Follows sign-in state changes until the identity source goes away.
    pub async fn follow_identity(&self, mut receiver: watch::Receiver<Option<Identity>>) {
        loop {
            let current = receiver.borrow_and_update().clone();
            self.apply_identity(current.as_ref()).await;
            if receiver.changed().await.is_err() {
                debug!("follow_identity: identity source closed");
                return;
            }
        }
    }

    /// Ends the session through `source` and clears the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Identity`] when sign-out fails; the board is
    /// left unchanged.
    pub async fn sign_out<I>(&self, source: &I) -> Result<SessionView, BoardError>
    where
        I: IdentitySource + ?Sized,
    {
        source.sign_out().await?;
        Ok(self.apply_identity(None).await)
    }

    /// Replaces the raw minutes text.
    pub fn set_raw_text(&self, text: impl Into<String>) {
        self.state().set_raw_text(text);
    }

    /// Reloads the owner's persisted tasks, replacing the cache.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotSignedIn`] without an owner, or
    /// [`BoardError::Store`] when the query fails; the previous cache is
    /// kept.
    pub async fn load_persisted(&self) -> Result<usize, BoardError> {
        let (owner, epoch) = self.state().begin_load().ok_or(BoardError::NotSignedIn)?;
        debug!(owner = %owner, "load_persisted: called");
        match self.store.list_for_owner(&owner).await {
            Ok(tasks) => {
                let count = tasks.len();
                self.state().finish_load(epoch, Some(tasks));
                info!(owner = %owner, count, "load_persisted: cache replaced");
                Ok(count)
            }
            Err(err) => {
                self.state().finish_load(epoch, None);
                warn!(owner = %owner, error = %err, "load_persisted: query failed");
                Err(err.into())
            }
        }
    }

    /// Extracts candidates from `raw_text`, replacing the candidate list.
    ///
    /// Failures are logged by the extractor and leave the list empty.
    pub async fn request_extraction(&self, raw_text: &str) -> ExtractionReport {
        let epoch = self.state().begin_extraction(raw_text);
        let report = self.extractor.extract_report(raw_text).await;
        if report.ignored > 0 {
            warn!(ignored = report.ignored, "request_extraction: reply entries ignored");
        }
        let applied = self
            .state()
            .finish_extraction(epoch, report.candidates.clone(), report.ignored);
        if !applied {
            debug!("request_extraction: session changed, result dropped");
        }
        report
    }

    /// Applies `patch` to the candidate at `index`.
    ///
    /// Returns `Ok(false)` when `index` is out of range.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] when the patch would blank a required
    /// field.
    pub fn edit_candidate(&self, index: usize, patch: &TaskPatch) -> Result<bool, BoardError> {
        Ok(self.state().edit_candidate(index, patch)?)
    }

    /// Removes the candidate at `index` immediately.
    pub fn remove_candidate(&self, index: usize) -> Option<CandidateTask> {
        self.state().remove_candidate(index)
    }

    /// Discards every candidate.
    pub fn clear_candidates(&self) {
        self.state().clear_candidates();
    }

    /// Writes every candidate as a new persisted task.
    ///
    /// Candidates are written one at a time in list order. Returns `Ok(0)`
    /// without contacting the store when there is nothing to save or no
    /// owner is known.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PartialSave`] when a write fails. Records
    /// written before it are promoted; the failing candidate, those after
    /// it and the raw text stay on the board.
    pub async fn confirm_save(&self) -> Result<usize, BoardError> {
        let Some(batch) = self.state().begin_save() else {
            debug!("confirm_save: nothing to save");
            return Ok(0);
        };
        debug!(owner = %batch.owner, count = batch.candidates.len(), "confirm_save: called");

        let mut saved = Vec::with_capacity(batch.candidates.len());
        let mut failure = None;
        for candidate in &batch.candidates {
            match self.store.create(&batch.owner, candidate).await {
                Ok(task) => saved.push(task),
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }

        let count = saved.len();
        let applied = self
            .state()
            .finish_save(batch.epoch, saved, failure.is_none());
        if !applied {
            warn!(count, "confirm_save: session changed, written records not promoted");
        }
        match failure {
            None => {
                info!(owner = %batch.owner, count, "confirm_save: candidates promoted");
                Ok(count)
            }
            Some(source) => {
                warn!(owner = %batch.owner, saved = count, error = %source, "confirm_save: write failed");
                Err(BoardError::PartialSave {
                    saved: count,
                    source,
                })
            }
        }
    }

    /// Writes `patch` to the persisted task `id` and merges it locally.
    ///
    /// Returns `Ok(false)` without a store write when the patch is empty.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::Domain`] for a patch that would blank a
    /// required field, [`BoardError::NotSignedIn`] without an owner, or
    /// [`BoardError::Store`] when the write fails. The cache is unchanged on
    /// error.
    pub async fn edit_persisted(
        &self,
        id: TaskId,
        requested: TaskPatch,
    ) -> Result<bool, BoardError> {
        let patch = requested.validated()?;
        if patch.is_empty() {
            debug!(task_id = %id, "edit_persisted: empty patch, nothing to write");
            return Ok(false);
        }
        let owner = self.current_owner()?;
        debug!(task_id = %id, "edit_persisted: called");
        if let Err(err) = self.store.update(&owner, id, &patch).await {
            warn!(task_id = %id, error = %err, "edit_persisted: update failed");
            return Err(err.into());
        }
        self.state().merge_persisted(id, &patch);
        info!(task_id = %id, "edit_persisted: task updated");
        Ok(true)
    }

    /// Deletes the persisted task `id` and drops it from the cache.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotSignedIn`] without an owner, or
    /// [`BoardError::Store`] when the delete fails; the cache is unchanged
    /// on error.
    pub async fn remove_persisted(&self, id: TaskId) -> Result<(), BoardError> {
        let owner = self.current_owner()?;
        debug!(task_id = %id, "remove_persisted: called");
        if let Err(err) = self.store.delete(&owner, id).await {
            warn!(task_id = %id, error = %err, "remove_persisted: delete failed");
            return Err(err.into());
        }
        self.state().drop_persisted(id);
        info!(task_id = %id, "remove_persisted: task deleted");
        Ok(())
    }

    /// Asks for confirmation before deleting `target`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownDeletionTarget`] when the target is not
    /// on the board.
    pub fn request_deletion(&self, target: DeletionTarget) -> Result<(), BoardError> {
        if self.state().request_deletion(target) {
            Ok(())
        } else {
            Err(BoardError::UnknownDeletionTarget(target))
        }
    }

    /// Withdraws the pending deletion without touching any list.
    pub fn cancel_deletion(&self) -> Option<DeletionTarget> {
        self.state().cancel_deletion()
    }

    /// Carries out the pending deletion.
    ///
    /// The request is consumed whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NoPendingDeletion`] when nothing awaits
    /// confirmation, or the error of the underlying removal.
    pub async fn confirm_deletion(&self) -> Result<DeletionTarget, BoardError> {
        let target = self
            .state()
            .take_deletion()
            .ok_or(BoardError::NoPendingDeletion)?;
        match target {
            DeletionTarget::Candidate(index) => {
                self.remove_candidate(index)
                    .ok_or(BoardError::UnknownDeletionTarget(target))?;
            }
            DeletionTarget::Persisted(id) => self.remove_persisted(id).await?,
        }
        Ok(target)
    }

    fn current_owner(&self) -> Result<OwnerId, BoardError> {
        self.state().owner().cloned().ok_or(BoardError::NotSignedIn)
    }
}
